pub mod ledger_writer;
pub mod registration_reader;
