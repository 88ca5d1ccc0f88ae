use super::coordinator::CoordinatorId;
use super::money::Amount;
use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_NOTES_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Unpaid,
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Failed,
    ];

    /// Still waiting on money from the participant.
    pub fn is_outstanding(self) -> bool {
        !matches!(self, PaymentStatus::Paid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Upi,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

/// A partial update to a payment record. Absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentAmendment {
    pub status: Option<PaymentStatus>,
    pub paid: Option<Amount>,
    pub method: Option<PaymentMethod>,
    pub notes: Option<String>,
    pub transaction_id: Option<String>,
}

/// Payment state of a single registration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub status: PaymentStatus,
    /// The fee expected from this registration.
    pub amount_due: Amount,
    /// Sum of everything collected so far.
    pub paid: Amount,
    pub paid_at: Option<DateTime<Utc>>,
    pub method: Option<PaymentMethod>,
    pub processed_by: Option<CoordinatorId>,
    #[serde(default)]
    pub notes: String,
    /// Gateway or UPI reference for non-cash payments.
    pub transaction_id: Option<String>,
}

/// Blank references are dropped.
fn reference(transaction_id: Option<String>) -> Option<String> {
    transaction_id
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn check_notes(notes: &str) -> Result<(), RegistryError> {
    if notes.chars().count() > MAX_NOTES_LEN {
        Err(RegistryError::validation(format!(
            "Notes cannot exceed {MAX_NOTES_LEN} characters"
        )))
    } else {
        Ok(())
    }
}

impl PaymentRecord {
    pub fn new(amount_due: Amount) -> Self {
        Self {
            amount_due,
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> Amount {
        self.amount_due.remaining_after(self.paid)
    }

    pub fn is_settled(&self, fee: Amount) -> bool {
        self.status == PaymentStatus::Paid && self.paid >= fee
    }

    /// Accumulates a (possibly partial) payment against `fee`.
    pub fn record(
        &mut self,
        amount: Amount,
        method: PaymentMethod,
        notes: Option<String>,
        by: CoordinatorId,
        fee: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        let notes = notes.unwrap_or_default();
        check_notes(&notes)?;
        if self.is_settled(fee) {
            return Err(RegistryError::conflict(
                "Payment already completed for this registration",
            ));
        }

        self.paid += amount;
        self.amount_due = fee;
        self.paid_at = Some(now);
        self.method = Some(method);
        self.processed_by = Some(by);
        self.notes = notes;
        self.status = if self.paid >= fee {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        };
        Ok(())
    }

    /// Settles the record outright, charging `amount` or the full fee.
    pub fn mark_paid(
        &mut self,
        amount: Option<Amount>,
        method: Option<PaymentMethod>,
        notes: Option<String>,
        by: CoordinatorId,
        fee: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        let notes = notes.unwrap_or_default();
        check_notes(&notes)?;

        self.status = PaymentStatus::Paid;
        self.amount_due = fee;
        self.paid = amount.unwrap_or(fee);
        self.paid_at = Some(now);
        self.method = Some(method.unwrap_or_default());
        self.notes = notes;
        self.processed_by = Some(by);
        Ok(())
    }

    /// Applies a manual correction. An explicit status always wins; a bare
    /// paid amount re-derives the status from the fee.
    pub fn amend(
        &mut self,
        amendment: PaymentAmendment,
        by: CoordinatorId,
        fee: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        if let Some(notes) = &amendment.notes {
            check_notes(notes)?;
        }

        if let Some(status) = amendment.status {
            self.status = status;
        }
        if let Some(paid) = amendment.paid {
            self.paid = paid;
            if amendment.status.is_none() {
                self.status = if paid >= fee {
                    PaymentStatus::Paid
                } else if !paid.is_zero() {
                    PaymentStatus::Pending
                } else {
                    PaymentStatus::Unpaid
                };
            }
        }
        if let Some(method) = amendment.method {
            self.method = Some(method);
        }
        if let Some(notes) = amendment.notes {
            self.notes = notes;
        }
        if let Some(transaction_id) = reference(amendment.transaction_id) {
            self.transaction_id = Some(transaction_id);
        }

        self.amount_due = fee;
        self.paid_at = Some(now);
        self.processed_by = Some(by);
        Ok(())
    }

    /// Clears everything collected. The expected fee is kept.
    pub fn reset(&mut self) {
        self.status = PaymentStatus::Unpaid;
        self.paid = Amount::ZERO;
        self.paid_at = None;
        self.method = None;
        self.notes.clear();
        self.processed_by = None;
        self.transaction_id = None;
    }

    /// Keeps the latest non-blank payment reference.
    pub fn attach_reference(&mut self, transaction_id: Option<String>) {
        if let Some(transaction_id) = reference(transaction_id) {
            self.transaction_id = Some(transaction_id);
        }
    }
}
