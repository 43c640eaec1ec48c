// ============================
// crates/backend-lib/src/routes.rs
// ============================
//! HTTP router for the member endpoints.
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use member_auth_common::{CredentialsBody, MemberBody, ResultCode, RsData};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use zeroize::Zeroizing;

use crate::error::AppError;
use crate::AppState;

/// Create the member router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/members/login", post(login))
        .route("/api/v1/members/check", post(check))
        .route("/api/v1/members/join", post(join))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Render an envelope with the HTTP status its code names
fn respond<T: Serialize>(rs: RsData<T>) -> Response {
    let status = StatusCode::from_u16(rs.result_code().status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(rs)).into_response()
}

/// Split a posted body into username and wiped-on-drop password,
/// or answer with an invalid-input envelope.
fn credentials(body: CredentialsBody) -> Result<(String, Zeroizing<String>), Response> {
    if let Some(field) = body.blank_field() {
        return Err(respond(RsData::<()>::failure(
            ResultCode::INVALID_INPUT,
            format!("{field} must not be blank"),
        )));
    }
    Ok((body.username, Zeroizing::new(body.password)))
}

async fn health() -> &'static str {
    "ok"
}

/// Exchange credentials for an access/refresh token pair
async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Response, AppError> {
    let (username, password) = match credentials(body) {
        Ok(parts) => parts,
        Err(response) => return Ok(response),
    };

    let rs = state.auth.authenticate(&username, &password).await?;
    Ok(respond(rs))
}

/// Check credentials without issuing tokens
async fn check(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Response, AppError> {
    let (username, password) = match credentials(body) {
        Ok(parts) => parts,
        Err(response) => return Ok(response),
    };

    let rs = match state.auth.check_credentials(&username, &password).await {
        Ok(member) => RsData::success(
            ResultCode::CREDENTIALS_OK,
            "Credentials match",
            MemberBody {
                username: member.username().to_string(),
            },
        ),
        Err(e) => e.into_envelope()?,
    };
    Ok(respond(rs))
}

/// Register a new member
async fn join(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Response, AppError> {
    let (username, password) = match credentials(body) {
        Ok(parts) => parts,
        Err(response) => return Ok(response),
    };

    let member = state.auth.join(&username, &password).await?;
    Ok(respond(RsData::success(
        ResultCode::JOINED,
        "Member joined",
        MemberBody {
            username: member.username().to_string(),
        },
    )))
}
