// ============================
// crates/backend-lib/src/member.rs
// ============================
//! Member identity record.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Registered member. Holds the password hash, never the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    username: String,
    password_hash: String,
}

impl Member {
    /// Build a member from an already-hashed password.
    ///
    /// Plaintext passwords go through `MemberService::join`, which hashes
    /// before calling this.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_hash() {
        let member = Member::new("admin".to_string(), "$scrypt$ln=15$abc$def".to_string());
        let debug = format!("{member:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("$scrypt$"));
    }
}
