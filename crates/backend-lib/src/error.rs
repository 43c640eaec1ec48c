// crates/backend-lib/src/error.rs

//! Central error types + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use member_auth_common::{ResultCode, RsData};
use thiserror::Error;

/// Application error types for faults the caller cannot fix by retrying
/// with different credentials.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Member already exists: {0}")]
    DuplicateMember(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the envelope code for this error
    pub fn result_code(&self) -> ResultCode {
        match self {
            AppError::DuplicateMember(_) => ResultCode::DUPLICATE_MEMBER,
            AppError::InvalidInput(_) => ResultCode::INVALID_INPUT,
            AppError::InvalidToken(_) => ResultCode::INVALID_TOKEN,
            _ => ResultCode::INTERNAL,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.result_code().status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Whether this error means the process is misconfigured
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Token(_))
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::DuplicateMember(_) => "Username is already taken".to_string(),
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            AppError::InvalidToken(_) => "Invalid token".to_string(),
            _ => "An internal server error occurred".to_string(),
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body: RsData<()> = RsData::failure(self.result_code(), message);
        (status, axum::Json(body)).into_response()
    }
}

/// Outcome of a rejected authentication attempt.
///
/// `MemberNotFound` and `InvalidCredential` are expected business outcomes
/// and end up as failure envelopes; `Fatal` carries everything else.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No member with that username")]
    MemberNotFound,

    #[error("Password does not match")]
    InvalidCredential,

    #[error(transparent)]
    Fatal(#[from] AppError),
}

impl AuthError {
    pub fn result_code(&self) -> ResultCode {
        match self {
            AuthError::MemberNotFound => ResultCode::MEMBER_NOT_FOUND,
            AuthError::InvalidCredential => ResultCode::INVALID_CREDENTIAL,
            AuthError::Fatal(e) => e.result_code(),
        }
    }

    /// Convert into a failure envelope, handing fatal errors back
    pub fn into_envelope<T>(self) -> Result<RsData<T>, AppError> {
        match self {
            AuthError::Fatal(e) => Err(e),
            rejected => Ok(RsData::failure(rejected.result_code(), rejected.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_app_error_display() {
        let dup = AppError::DuplicateMember("admin".to_string());
        assert_eq!(dup.to_string(), "Member already exists: admin");

        let io_error = AppError::Io(IoError::new(ErrorKind::NotFound, "File not found"));
        assert!(io_error.to_string().contains("IO error"));
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::DuplicateMember("admin".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidInput("blank".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidToken("expired".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Config("no secret".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_result_codes() {
        assert_eq!(
            AppError::DuplicateMember("admin".to_string()).result_code(),
            ResultCode::DUPLICATE_MEMBER
        );
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        assert_eq!(AppError::Json(json_err).result_code(), ResultCode::INTERNAL);
    }

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::Config("missing".to_string()).is_fatal());
        assert!(!AppError::InvalidInput("blank".to_string()).is_fatal());
    }

    #[test]
    fn test_auth_error_codes() {
        assert_eq!(AuthError::MemberNotFound.result_code(), ResultCode::MEMBER_NOT_FOUND);
        assert_eq!(AuthError::InvalidCredential.result_code(), ResultCode::INVALID_CREDENTIAL);
        assert_ne!(
            AuthError::MemberNotFound.result_code(),
            AuthError::InvalidCredential.result_code()
        );
    }

    #[test]
    fn test_auth_error_into_envelope() {
        let rs = AuthError::InvalidCredential.into_envelope::<()>().unwrap();
        assert_eq!(rs.result_code(), ResultCode::INVALID_CREDENTIAL);
        assert!(rs.data().is_none());

        let fatal = AuthError::Fatal(AppError::Config("no key".to_string()));
        assert!(matches!(fatal.into_envelope::<()>(), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_error_response_is_failure_envelope() {
        let response = AppError::DuplicateMember("admin".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/json"));
    }
}
