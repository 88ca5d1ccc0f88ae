use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinatorId(String);

impl CoordinatorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoordinatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Coordinator,
    Admin,
}

/// A staff account allowed to process payments.
///
/// Coordinators authenticate with an opaque bearer `token`; a coordinator
/// only sees reports for the registrations they processed, admins see all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinator {
    pub id: CoordinatorId,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    pub token: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Coordinator {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role, token: impl Into<String>) -> Self {
        Self {
            id: CoordinatorId::new(id),
            name: name.into(),
            role,
            token: token.into(),
            active: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
