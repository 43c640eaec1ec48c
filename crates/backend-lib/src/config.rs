// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{token::MIN_SECRET_LEN, ScryptHasher, TokenIssuer};
use crate::error::AppError;

/// Default config file looked up by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `MEMBER_AUTH_TOKEN__SECRET`
pub const ENV_PREFIX: &str = "MEMBER_AUTH_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path, used by the flat-file store
    pub data_dir: PathBuf,
    /// Member store backend
    pub storage: StorageKind,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    pub token: TokenSettings,
    pub hasher: HasherSettings,
    pub seed: SeedSettings,
}

/// Member store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Memory,
    FlatFile,
}

/// Token signing settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// HS256 signing secret
    pub secret: String,
    /// Access token TTL in seconds
    pub access_ttl_secs: u64,
    /// Refresh token TTL in seconds
    pub refresh_ttl_secs: u64,
}

/// scrypt cost parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

/// Members created at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    pub enabled: bool,
    pub members: Vec<SeedMember>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SeedMember {
    pub username: String,
    pub password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("data"),
            storage: StorageKind::Memory,
            log_level: "info".to_string(),
            log_json: false,
            token: TokenSettings::default(),
            hasher: HasherSettings::default(),
            seed: SeedSettings::default(),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            // no usable default, must come from the environment or a config file
            secret: String::new(),
            access_ttl_secs: 60 * 30,
            refresh_ttl_secs: 60 * 60 * 24 * 7,
        }
    }
}

impl Default for HasherSettings {
    fn default() -> Self {
        Self {
            log_n: 17,
            r: 8,
            p: 1,
        }
    }
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            members: ["admin", "user1", "user2"]
                .into_iter()
                .map(|username| SeedMember {
                    username: username.to_string(),
                    password: "1234".to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

impl fmt::Debug for SeedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedMember")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl TokenSettings {
    /// Build the token issuer these settings describe
    pub fn issuer(&self) -> Result<TokenIssuer, AppError> {
        TokenIssuer::new(
            self.secret.as_bytes(),
            Duration::from_secs(self.access_ttl_secs),
            Duration::from_secs(self.refresh_ttl_secs),
        )
    }
}

impl HasherSettings {
    pub fn hasher(&self) -> Result<ScryptHasher, AppError> {
        ScryptHasher::with_params(self.log_n, self.r, self.p)
    }
}

impl Settings {
    /// Load settings from `config.toml` and `MEMBER_AUTH_*` environment variables
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from a specific TOML file, then apply environment overrides.
    /// A missing file is not an error; defaults and the environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "log_level must be one of {LOG_LEVELS:?}, got {:?}",
                self.log_level
            )));
        }

        if self.token.secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "token.secret must be at least {MIN_SECRET_LEN} bytes (set {ENV_PREFIX}TOKEN__SECRET)"
            )));
        }

        if self.token.access_ttl_secs == 0
            || self.token.access_ttl_secs >= self.token.refresh_ttl_secs
        {
            return Err(AppError::Config(
                "token.access_ttl_secs must be non-zero and less than token.refresh_ttl_secs"
                    .to_string(),
            ));
        }

        self.hasher.hasher()?;

        if self.seed.enabled {
            if let Some(blank) = self
                .seed
                .members
                .iter()
                .find(|m| m.username.trim().is_empty() || m.password.trim().is_empty())
            {
                return Err(AppError::Config(format!(
                    "seed member {:?} has a blank username or password",
                    blank.username
                )));
            }
        }

        Ok(())
    }
}
