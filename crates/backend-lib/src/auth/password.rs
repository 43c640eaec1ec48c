// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use password_hash::rand_core::OsRng;
use scrypt::{
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Params, Scrypt,
};

use crate::error::AppError;

/// One-way hash + verify primitive used by the member service
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing PHC string
    fn hash(&self, plain: &str) -> Result<String, AppError>;

    /// Check a plaintext password against a stored hash. Malformed hashes never match.
    fn verify(&self, hash: &str, plain: &str) -> bool;
}

/// scrypt-backed hasher
#[derive(Debug, Clone)]
pub struct ScryptHasher {
    params: Params,
}

impl Default for ScryptHasher {
    fn default() -> Self {
        Self {
            params: Params::recommended(),
        }
    }
}

impl ScryptHasher {
    /// Hasher with explicit cost parameters (`log_n`, `r`, `p`)
    pub fn with_params(log_n: u8, r: u32, p: u32) -> Result<Self, AppError> {
        let params = Params::new(log_n, r, p, Params::RECOMMENDED_LEN)
            .map_err(|e| AppError::Config(format!("invalid scrypt parameters: {e}")))?;
        Ok(Self { params })
    }
}

impl PasswordHasher for ScryptHasher {
    fn hash(&self, plain: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| AppError::PasswordHash(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, hash: &str, plain: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }
}
