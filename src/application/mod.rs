//! Application services orchestrating the domain over the storage ports.
//!
//! `RegistrationService` owns every write to registrations and serialises
//! them behind a single async mutex; the event desk borrows that lock when
//! it appends event signups so both paths see a consistent record.

pub mod events;
pub mod registry;
pub mod reporting;
pub mod tasks;
