// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed access/refresh token issuance.
//!
//! Tokens are HS256 JWTs. Each one embeds the member's username (`sub`), its
//! kind, issuance and expiry times, and a random `jti`, so no two issued
//! tokens are equal even within the same second.
use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use member_auth_common::TokenPair;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::member::Member;

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Default access token lifetime (30 minutes)
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(30 * 60);

/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Which half of a token pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the member the token is bound to
    pub sub: String,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues and decodes tokens bound to a member identity
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer. A short secret or an access lifetime that is not
    /// shorter than the refresh lifetime is a configuration error.
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "token secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if access_ttl.is_zero() || access_ttl >= refresh_ttl {
            return Err(AppError::Config(
                "access token lifetime must be non-zero and shorter than refresh token lifetime"
                    .to_string(),
            ));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    fn issue(&self, member: &Member, kind: TokenKind) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: member.username().to_string(),
            typ: kind,
            iat,
            exp: iat + self.ttl(kind).as_secs() as i64,
            jti: Uuid::new_v4().to_string(),
        };

        debug!(username = %claims.sub, kind = ?kind, exp = claims.exp, "issuing token");

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Short-lived token proving the member's identity
    pub fn issue_access_token(&self, member: &Member) -> Result<String, AppError> {
        self.issue(member, TokenKind::Access)
    }

    /// Longer-lived token used only to obtain new access tokens
    pub fn issue_refresh_token(&self, member: &Member) -> Result<String, AppError> {
        self.issue(member, TokenKind::Refresh)
    }

    pub fn issue_pair(&self, member: &Member) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(member)?,
            refresh_token: self.issue_refresh_token(member)?,
        })
    }

    /// Validate signature and expiry, and check the token is of the expected kind
    pub fn decode(&self, token: &str, kind: TokenKind) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| AppError::InvalidToken(e.to_string()))?
            .claims;

        if claims.typ != kind {
            return Err(AppError::InvalidToken(format!(
                "expected {kind:?} token, got {:?}",
                claims.typ
            )));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-that-is-long-enough-0123";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL).unwrap()
    }

    fn admin() -> Member {
        Member::new("admin".to_string(), "hash".to_string())
    }

    #[test]
    fn test_issue_and_decode_pair() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&admin()).unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);

        let access = issuer.decode(&pair.access_token, TokenKind::Access).unwrap();
        let refresh = issuer.decode(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(access.sub, "admin");
        assert_eq!(refresh.sub, "admin");
        assert!(access.exp < refresh.exp);
        assert_eq!(access.exp - access.iat, DEFAULT_ACCESS_TTL.as_secs() as i64);
    }

    #[test]
    fn test_tokens_are_fresh() {
        let issuer = issuer();
        let first = issuer.issue_pair(&admin()).unwrap();
        let second = issuer.issue_pair(&admin()).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&admin()).unwrap();

        assert!(matches!(
            issuer.decode(&pair.refresh_token, TokenKind::Access),
            Err(AppError::InvalidToken(_))
        ));
        assert!(matches!(
            issuer.decode(&pair.access_token, TokenKind::Refresh),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_different_secrets_reject() {
        let other = TokenIssuer::new(
            b"another-secret-key-that-is-long-enough-99",
            DEFAULT_ACCESS_TTL,
            DEFAULT_REFRESH_TTL,
        )
        .unwrap();
        let token = issuer().issue_access_token(&admin()).unwrap();

        assert!(other.decode(&token, TokenKind::Access).is_err());
        assert!(issuer().decode("invalid.token.here", TokenKind::Access).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let iat = Utc::now().timestamp() - 3600;
        let claims = Claims {
            sub: "admin".to_string(),
            typ: TokenKind::Access,
            iat,
            exp: iat + 60,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            issuer.decode(&token, TokenKind::Access),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_configuration_checked_at_construction() {
        assert!(matches!(
            TokenIssuer::new(b"short", DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            TokenIssuer::new(SECRET, DEFAULT_REFRESH_TTL, DEFAULT_ACCESS_TTL),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            TokenIssuer::new(SECRET, Duration::ZERO, DEFAULT_REFRESH_TTL),
            Err(AppError::Config(_))
        ));
    }
}
