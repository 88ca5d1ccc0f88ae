//! Domain layer: registrations, fees, payment reconciliation rules, events,
//! tasks, and the storage ports the application layer depends on.

pub mod coordinator;
pub mod event;
pub mod fee;
pub mod money;
pub mod payment;
pub mod ports;
pub mod registration;
pub mod task;
