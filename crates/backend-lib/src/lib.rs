// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend functionality for member authentication: credential
//! lookup, password verification, and access/refresh token issuance.

pub mod auth;
pub mod config;
pub mod error;
pub mod member;
pub mod metrics;
pub mod routes;
pub mod seed;
pub mod storage;

use std::sync::Arc;

use crate::auth::{AuthService, MemberService};
use crate::config::{Settings, StorageKind};
use crate::error::AppError;
use crate::storage::{FlatFileMemberStore, InMemoryMemberStore, MemberStore};

pub use member_auth_common as common;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over the given member store.
    ///
    /// Fails when the token or hasher settings are unusable; callers should
    /// treat that as fatal at startup.
    pub fn new(store: Arc<dyn MemberStore>, settings: Settings) -> Result<Self, AppError> {
        let tokens = settings.token.issuer()?;
        let hasher = Arc::new(settings.hasher.hasher()?);
        let auth = Arc::new(MemberService::new(store, hasher, tokens));

        Ok(Self {
            auth,
            settings: Arc::new(settings),
        })
    }

    /// Create a new application state with the store named in `settings`
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let store = open_store(&settings)?;
        Self::new(store, settings)
    }
}

/// Open the member store selected by `settings.storage`
pub fn open_store(settings: &Settings) -> Result<Arc<dyn MemberStore>, AppError> {
    let store: Arc<dyn MemberStore> = match settings.storage {
        StorageKind::Memory => Arc::new(InMemoryMemberStore::new()),
        StorageKind::FlatFile => Arc::new(FlatFileMemberStore::new(&settings.data_dir)?),
    };
    Ok(store)
}
