use std::sync::Arc;

use async_trait::async_trait;
use member_auth_common::{ResultCode, RsData, TokenPair};
use metrics::counter;
use tracing::{info, instrument, warn};

use crate::auth::{AuthService, PasswordHasher, TokenIssuer};
use crate::error::{AppError, AuthError};
use crate::member::Member;
use crate::metrics::{LOGIN_REJECTED, LOGIN_SUCCEEDED, MEMBER_JOINED};
use crate::storage::MemberStore;

/// Default [`AuthService`]: lookup, verify, issue.
pub struct MemberService {
    store: Arc<dyn MemberStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenIssuer,
}

impl MemberService {
    pub fn new(store: Arc<dyn MemberStore>, hasher: Arc<dyn PasswordHasher>, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

#[async_trait]
impl AuthService for MemberService {
    #[instrument(skip(self, password))]
    async fn authenticate(&self, username: &str, password: &str) -> Result<RsData<TokenPair>, AppError> {
        match self.login(username, password).await {
            Ok(pair) => {
                counter!(LOGIN_SUCCEEDED).increment(1);
                info!("login succeeded");
                Ok(RsData::success(ResultCode::LOGIN_OK, "Login succeeded", pair))
            }
            Err(AuthError::Fatal(e)) => Err(e),
            Err(rejected) => {
                let reason = match rejected {
                    AuthError::MemberNotFound => "member_not_found",
                    _ => "invalid_credential",
                };
                counter!(LOGIN_REJECTED, "reason" => reason).increment(1);
                warn!(reason, "login rejected");
                rejected.into_envelope()
            }
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let member = self.check_credentials(username, password).await?;
        Ok(self.tokens.issue_pair(&member)?)
    }

    async fn check_credentials(&self, username: &str, password: &str) -> Result<Member, AuthError> {
        // a miss ends here, before any hashing work
        let member = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::MemberNotFound)?;

        if !self.verify_password(&member, password) {
            return Err(AuthError::InvalidCredential);
        }

        Ok(member)
    }

    fn verify_password(&self, member: &Member, password: &str) -> bool {
        self.hasher.verify(member.password_hash(), password)
    }

    #[instrument(skip(self, password))]
    async fn join(&self, username: &str, password: &str) -> Result<Member, AppError> {
        if username.trim().is_empty() {
            return Err(AppError::InvalidInput("username must not be blank".to_string()));
        }
        if password.trim().is_empty() {
            return Err(AppError::InvalidInput("password must not be blank".to_string()));
        }

        let member = Member::new(username.to_string(), self.hasher.hash(password)?);
        self.store.save(member.clone()).await?;

        counter!(MEMBER_JOINED).increment(1);
        info!("member joined");

        Ok(member)
    }
}
