use crate::domain::money::Amount;
use crate::domain::payment::PaymentMethod;
use crate::domain::registration::{NewRegistration, ParticipationType, UserType};
use crate::error::{RegistryError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of a registration import file.
///
/// `paid` and `method` are optional trailing columns for desks that took
/// money before the data was keyed in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportRow {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub user_type: Option<UserType>,
    pub participation_type: Option<ParticipationType>,
    #[serde(default)]
    pub paid: Option<Amount>,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
}

impl ImportRow {
    pub fn signup(&self) -> NewRegistration {
        NewRegistration {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            college: self.college.clone(),
            user_type: self.user_type.unwrap_or_default(),
            participation_type: self.participation_type.unwrap_or_default(),
            ..Default::default()
        }
    }

    /// The amount already collected, if any.
    pub fn collected(&self) -> Option<(Amount, PaymentMethod)> {
        self.paid
            .filter(|paid| !paid.is_zero())
            .map(|paid| (paid, self.method.unwrap_or_default()))
    }
}

/// Reads registrations from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace and tolerating rows without the
/// optional payment columns.
pub struct RegistrationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RegistrationReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes rows so large files stream through.
    pub fn rows(self) -> impl Iterator<Item = Result<ImportRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(RegistryError::from))
    }
}
