// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the entry point callers use
//! to register members and exchange credentials for tokens.
use async_trait::async_trait;
use member_auth_common::{RsData, TokenPair};

use crate::error::{AppError, AuthError};
use crate::member::Member;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify the credentials and, on success, issue a fresh token pair.
    ///
    /// Unknown usernames and wrong passwords come back as failure envelopes;
    /// `Err` is reserved for storage and token-signing faults.
    async fn authenticate(&self, username: &str, password: &str) -> Result<RsData<TokenPair>, AppError>;

    /// Typed form of [`AuthService::authenticate`]
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Look up and verify a member without issuing tokens
    async fn check_credentials(&self, username: &str, password: &str) -> Result<Member, AuthError>;

    /// Pure predicate: does `password` match the member's stored hash
    fn verify_password(&self, member: &Member, password: &str) -> bool;

    /// Register a new member, hashing the password before it is stored
    async fn join(&self, username: &str, password: &str) -> Result<Member, AppError>;
}
