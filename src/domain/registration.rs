use super::event::RegisteredEvent;
use super::money::Amount;
use super::payment::PaymentRecord;
use crate::error::RegistryError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_NAME_LEN: usize = 100;
const REGISTER_PREFIX: &str = "REG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Visitor,
    Participant,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Visitor => "visitor",
            UserType::Participant => "participant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationType {
    #[default]
    None,
    Sports,
    Cultural,
    Both,
}

impl ParticipationType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipationType::None => "none",
            ParticipationType::Sports => "sports",
            ParticipationType::Cultural => "cultural",
            ParticipationType::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Human-facing registration number, `REG` + two-digit year + six-digit
/// sequence, e.g. `REG26000042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterId(String);

impl RegisterId {
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn prefix_for(year: i32) -> String {
        format!("{REGISTER_PREFIX}{:02}", year.rem_euclid(100))
    }

    /// Sequence number if this id belongs to `year`.
    pub fn sequence(&self, year: i32) -> Option<u32> {
        self.0
            .strip_prefix(&Self::prefix_for(year))
            .and_then(|digits| digits.parse().ok())
    }

    /// The id following the highest sequence among `existing` for `year`.
    pub fn next<'a, I>(year: i32, existing: I) -> Self
    where
        I: IntoIterator<Item = &'a RegisterId>,
    {
        let last = existing
            .into_iter()
            .filter_map(|id| id.sequence(year))
            .max()
            .unwrap_or(0);
        Self(format!("{}{:06}", Self::prefix_for(year), last + 1))
    }

    pub fn next_for(now: DateTime<Utc>, existing: &[RegisterId]) -> Self {
        Self::next(now.year(), existing)
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: Option<String>,
    pub year: Option<String>,
    pub roll_number: Option<String>,
}

/// One person's signup, with the payment state tracked alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub register_id: RegisterId,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub department: Option<String>,
    pub year: Option<String>,
    pub roll_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub user_type: UserType,
    pub participation_type: ParticipationType,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default)]
    pub registered_events: Vec<RegisteredEvent>,
    pub payment: PaymentRecord,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// True when `key` (case-insensitive) is this registration's register id
    /// or user id.
    pub fn matches_key(&self, key: &str) -> bool {
        let key = key.trim().to_uppercase();
        self.register_id.as_str() == key || self.user_id == key
    }

    pub fn display_event(&self) -> String {
        match self.registered_events.first() {
            Some(event) => event.event_name.clone(),
            None => format!(
                "{} - {}",
                self.user_type.as_str(),
                self.participation_type.as_str()
            ),
        }
    }

    /// Case-insensitive substring search over the identifying fields.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.name.as_str(),
            self.register_id.as_str(),
            self.user_id.as_str(),
            self.email.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Signup data as submitted, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRegistration {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub department: Option<String>,
    pub year: Option<String>,
    pub roll_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub user_type: UserType,
    pub participation_type: ParticipationType,
    pub team_members: Vec<TeamMember>,
}

fn required(field: &str, value: &str) -> Result<String, RegistryError> {
    let value = value.trim();
    if value.is_empty() {
        Err(RegistryError::validation(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_name(name: &str) -> Result<(), RegistryError> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(RegistryError::validation(format!(
            "Name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Loose shape check: `local@domain.tld`.
pub fn normalize_email(raw: &str) -> Result<String, RegistryError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(RegistryError::validation("Please enter a valid email"))
    }
}

impl NewRegistration {
    pub fn into_registration(
        self,
        register_id: RegisterId,
        amount_due: Amount,
        now: DateTime<Utc>,
    ) -> Result<Registration, RegistryError> {
        let user_id = required("User ID", &self.user_id)?.to_uppercase();
        let name = required("Name", &self.name)?;
        check_name(&name)?;
        let email = normalize_email(&required("Email", &self.email)?)?;
        let phone = required("Phone", &self.phone)?;
        let college = required("College", &self.college)?;

        Ok(Registration {
            register_id,
            user_id,
            name,
            email,
            phone,
            college,
            department: optional(self.department),
            year: optional(self.year),
            roll_number: optional(self.roll_number),
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            user_type: self.user_type,
            participation_type: self.participation_type,
            team_members: self.team_members,
            registered_events: Vec::new(),
            payment: PaymentRecord::new(amount_due),
            active: true,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A partial profile edit. Absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub gender: Option<Gender>,
    pub user_type: Option<UserType>,
    pub participation_type: Option<ParticipationType>,
    pub team_members: Option<Vec<TeamMember>>,
}

impl RegistrationUpdate {
    pub fn apply(self, registration: &mut Registration, now: DateTime<Utc>) -> Result<(), RegistryError> {
        if let Some(name) = self.name {
            let name = required("Name", &name)?;
            check_name(&name)?;
            registration.name = name;
        }
        if let Some(phone) = self.phone {
            registration.phone = required("Phone", &phone)?;
        }
        if let Some(college) = self.college {
            registration.college = required("College", &college)?;
        }
        if self.department.is_some() {
            registration.department = optional(self.department);
        }
        if self.year.is_some() {
            registration.year = optional(self.year);
        }
        if let Some(gender) = self.gender {
            registration.gender = Some(gender);
        }
        if let Some(user_type) = self.user_type {
            registration.user_type = user_type;
        }
        if let Some(participation) = self.participation_type {
            registration.participation_type = participation;
        }
        if let Some(members) = self.team_members {
            registration.team_members = members;
        }
        registration.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signup() -> NewRegistration {
        NewRegistration {
            user_id: "mh26001".into(),
            name: "  Asha Rao ".into(),
            email: "Asha.Rao@Example.com".into(),
            phone: "9000000001".into(),
            college: "NIT Warangal".into(),
            user_type: UserType::Participant,
            participation_type: ParticipationType::Sports,
            ..Default::default()
        }
    }

    #[test]
    fn test_register_id_sequence() {
        let existing = vec![
            RegisterId::parse("REG26000001"),
            RegisterId::parse("REG26000007"),
            RegisterId::parse("REG25000099"),
        ];
        assert_eq!(RegisterId::next(2026, &existing).as_str(), "REG26000008");
        assert_eq!(RegisterId::next(2027, &existing).as_str(), "REG27000001");
        assert_eq!(RegisterId::next(2026, &[]).as_str(), "REG26000001");
    }

    #[test]
    fn test_register_id_ignores_garbage() {
        let existing = vec![RegisterId::parse("REG26ABC"), RegisterId::parse("reg26000003")];
        assert_eq!(RegisterId::next(2026, &existing).as_str(), "REG26000004");
    }

    #[test]
    fn test_new_registration_normalizes_fields() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap();
        let reg = signup()
            .into_registration(RegisterId::parse("REG26000001"), Amount::rupees(200), now)
            .unwrap();

        assert_eq!(reg.user_id, "MH26001");
        assert_eq!(reg.name, "Asha Rao");
        assert_eq!(reg.email, "asha.rao@example.com");
        assert_eq!(reg.payment.amount_due, Amount::rupees(200));
        assert!(reg.active);
        assert!(reg.matches_key("mh26001"));
        assert!(reg.matches_key("reg26000001"));
        assert!(!reg.matches_key("REG26000002"));
    }

    #[test]
    fn test_new_registration_requires_fields() {
        let mut missing = signup();
        missing.college = "   ".into();
        let result = missing.into_registration(RegisterId::parse("REG26000001"), Amount::ZERO, Utc::now());
        assert!(matches!(result, Err(RegistryError::ValidationError(m)) if m.contains("College")));

        let mut bad_email = signup();
        bad_email.email = "asha@localhost".into();
        assert!(bad_email
            .into_registration(RegisterId::parse("REG26000001"), Amount::ZERO, Utc::now())
            .is_err());

        let mut long_name = signup();
        long_name.name = "a".repeat(MAX_NAME_LEN + 1);
        assert!(long_name
            .into_registration(RegisterId::parse("REG26000001"), Amount::ZERO, Utc::now())
            .is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(normalize_email("a@b.co").is_ok());
        assert!(normalize_email("@b.co").is_err());
        assert!(normalize_email("a@@b.co").is_err());
        assert!(normalize_email("a@.co").is_err());
        assert!(normalize_email("plain").is_err());
    }

    #[test]
    fn test_display_event_falls_back_to_type() {
        let reg = signup()
            .into_registration(RegisterId::parse("REG26000001"), Amount::ZERO, Utc::now())
            .unwrap();
        assert_eq!(reg.display_event(), "participant - sports");
        assert!(reg.matches_search("asha"));
        assert!(reg.matches_search("REG26"));
        assert!(!reg.matches_search("nobody"));
    }

    #[test]
    fn test_update_applies_partial_fields() {
        let mut reg = signup()
            .into_registration(RegisterId::parse("REG26000001"), Amount::ZERO, Utc::now())
            .unwrap();
        RegistrationUpdate {
            participation_type: Some(ParticipationType::Both),
            department: Some("  ".into()),
            ..Default::default()
        }
        .apply(&mut reg, Utc::now())
        .unwrap();

        assert_eq!(reg.participation_type, ParticipationType::Both);
        assert_eq!(reg.department, None);
        assert_eq!(reg.name, "Asha Rao");

        let err = RegistrationUpdate {
            name: Some(" ".into()),
            ..Default::default()
        }
        .apply(&mut reg, Utc::now());
        assert!(err.is_err());
    }
}
