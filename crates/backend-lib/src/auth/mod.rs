// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod password;
mod service;
mod service_impl;
pub mod token;

pub use password::{PasswordHasher, ScryptHasher};
pub use service::AuthService;
pub use service_impl::MemberService;
pub use token::{Claims, TokenIssuer, TokenKind};
