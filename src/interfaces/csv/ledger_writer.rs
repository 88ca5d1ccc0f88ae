use crate::domain::registration::Registration;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    register_id: &'a str,
    user_id: &'a str,
    name: &'a str,
    college: &'a str,
    user_type: &'static str,
    participation_type: &'static str,
    status: &'static str,
    amount_due: Decimal,
    paid: Decimal,
    remaining: Decimal,
    method: &'static str,
    processed_by: &'a str,
}

impl<'a> From<&'a Registration> for LedgerRow<'a> {
    fn from(r: &'a Registration) -> Self {
        Self {
            register_id: r.register_id.as_str(),
            user_id: &r.user_id,
            name: &r.name,
            college: &r.college,
            user_type: r.user_type.as_str(),
            participation_type: r.participation_type.as_str(),
            status: r.payment.status.as_str(),
            amount_due: r.payment.amount_due.normalized(),
            paid: r.payment.paid.normalized(),
            remaining: r.payment.remaining().normalized(),
            method: r.payment.method.map_or("", |m| m.as_str()),
            processed_by: r.payment.processed_by.as_ref().map_or("", |c| c.as_str()),
        }
    }
}

/// Writes the payment ledger as CSV, one row per registration.
pub struct LedgerWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes rows ordered by register id and flushes.
    pub fn write_ledger(&mut self, mut registrations: Vec<Registration>) -> Result<()> {
        registrations.sort_by(|a, b| a.register_id.as_str().cmp(b.register_id.as_str()));
        for registration in &registrations {
            self.writer.serialize(LedgerRow::from(registration))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
