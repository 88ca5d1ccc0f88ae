use crate::domain::coordinator::{Coordinator, CoordinatorId, Role};
use crate::domain::fee::FeeSchedule;
use crate::domain::ports::CoordinatorStoreBox;
use crate::error::{RegistryError, Result};
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_ADMIN_ID: &str = "admin";

/// A coordinator account declared in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatorSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    pub token: String,
}

impl From<CoordinatorSeed> for Coordinator {
    fn from(seed: CoordinatorSeed) -> Self {
        Coordinator::new(seed.id, seed.name, seed.role, seed.token)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub db_path: Option<PathBuf>,
    pub cors_origins: Vec<String>,
    pub fees: FeeSchedule,
    pub coordinators: Vec<CoordinatorSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            db_path: None,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            fees: FeeSchedule::default(),
            coordinators: Vec::new(),
        }
    }
}

impl Config {
    /// Reads a JSON config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let raw = read_to_string(path).map_err(|e| {
            RegistryError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            RegistryError::ConfigError(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;

        info!(path = %path.display(), coordinators = config.coordinators.len(), "Loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (i, seed) in self.coordinators.iter().enumerate() {
            if seed.id.trim().is_empty() || seed.token.trim().is_empty() {
                return Err(RegistryError::ConfigError(format!(
                    "coordinator #{} needs both an id and a token",
                    i + 1
                )));
            }
            if self.coordinators[..i].iter().any(|s| s.token == seed.token) {
                return Err(RegistryError::ConfigError(format!(
                    "coordinator {} reuses another coordinator's token",
                    seed.id
                )));
            }
        }
        Ok(())
    }

    /// Makes the store match the configured coordinators: every configured
    /// account is written and every other stored account is deactivated.
    ///
    /// With no coordinators configured, the only account is a default
    /// `admin`. Its token is `admin_token`, the token it already holds in
    /// the store, or a freshly generated one that is logged once.
    pub async fn seed_coordinators(
        &self,
        store: &CoordinatorStoreBox,
        admin_token: Option<String>,
    ) -> Result<()> {
        let accounts: Vec<Coordinator> = if self.coordinators.is_empty() {
            vec![default_admin(store, admin_token).await?]
        } else {
            self.coordinators.iter().cloned().map(Coordinator::from).collect()
        };
        for account in &accounts {
            store.store(account.clone()).await?;
        }

        for mut stale in store.get_all().await? {
            if stale.active && !accounts.iter().any(|a| a.id == stale.id) {
                warn!(id = %stale.id, "Deactivated coordinator missing from config");
                stale.active = false;
                store.store(stale).await?;
            }
        }
        Ok(())
    }
}

async fn default_admin(
    store: &CoordinatorStoreBox,
    admin_token: Option<String>,
) -> Result<Coordinator> {
    let token = match admin_token {
        Some(token) => token,
        None => match store.get(&CoordinatorId::new(DEFAULT_ADMIN_ID)).await? {
            Some(admin) if admin.active && admin.is_admin() => admin.token,
            _ => {
                let token = Uuid::new_v4().simple().to_string();
                warn!(token = %token, "No coordinators configured, generated an admin token");
                token
            }
        },
    };
    info!(id = DEFAULT_ADMIN_ID, "Seeded default admin");
    Ok(Coordinator::new(DEFAULT_ADMIN_ID, "Administrator", Role::Admin, token))
}
