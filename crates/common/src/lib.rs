// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between member-auth clients and the server.
//! This module defines the result envelope and the request/response bodies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structured status identifier carried by every [`RsData`].
///
/// Rendered as `"<http-class>-<sequence>"`, e.g. `"400-2"`. The leading
/// part doubles as the HTTP status a transport should answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultCode {
    status: u16,
    seq: u16,
}

impl ResultCode {
    /// Login succeeded, tokens issued
    pub const LOGIN_OK: Self = Self::new(200, 1);
    /// Credentials matched, no tokens issued
    pub const CREDENTIALS_OK: Self = Self::new(200, 2);
    /// Member created
    pub const JOINED: Self = Self::new(201, 1);
    /// No member with that username
    pub const MEMBER_NOT_FOUND: Self = Self::new(400, 1);
    /// Password does not match the stored hash
    pub const INVALID_CREDENTIAL: Self = Self::new(400, 2);
    /// Blank or malformed request field
    pub const INVALID_INPUT: Self = Self::new(400, 3);
    /// Token failed signature, expiry or kind checks
    pub const INVALID_TOKEN: Self = Self::new(401, 1);
    /// Username already taken
    pub const DUPLICATE_MEMBER: Self = Self::new(409, 1);
    /// Anything the caller cannot fix
    pub const INTERNAL: Self = Self::new(500, 1);

    pub const fn new(status: u16, seq: u16) -> Self {
        Self { status, seq }
    }

    /// HTTP-class part of the code
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the code belongs to the success family (2xx)
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.status, self.seq)
    }
}

/// Error returned when a string is not a `<status>-<seq>` code
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed result code: {0:?}")]
pub struct ParseResultCodeError(String);

impl FromStr for ResultCode {
    type Err = ParseResultCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseResultCodeError(s.to_string());
        let (status, seq) = s.split_once('-').ok_or_else(err)?;
        let status = status.parse::<u16>().map_err(|_| err())?;
        let seq = seq.parse::<u16>().map_err(|_| err())?;
        if !(100..600).contains(&status) {
            return Err(err());
        }
        Ok(Self::new(status, seq))
    }
}

impl Serialize for ResultCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Uniform success/failure envelope returned by every member operation.
///
/// A failure code never carries `data`; this holds for values built through
/// the constructors and for values read off the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(
    rename_all = "camelCase",
    try_from = "RawRsData<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct RsData<T> {
    result_code: ResultCode,
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRsData<T> {
    result_code: ResultCode,
    msg: String,
    data: Option<T>,
}

/// Error returned when an envelope on the wire breaks the code/data contract
#[derive(Debug, Error)]
#[error("failure code {0} must not carry data")]
pub struct EnvelopeError(ResultCode);

impl<T> TryFrom<RawRsData<T>> for RsData<T> {
    type Error = EnvelopeError;

    fn try_from(raw: RawRsData<T>) -> Result<Self, Self::Error> {
        if !raw.result_code.is_success() && raw.data.is_some() {
            return Err(EnvelopeError(raw.result_code));
        }
        Ok(Self {
            result_code: raw.result_code,
            msg: raw.msg,
            data: raw.data,
        })
    }
}

impl<T> RsData<T> {
    /// Success carrying a payload.
    ///
    /// # Panics
    /// In debug builds, when `code` is not a success code.
    pub fn success(code: ResultCode, msg: impl Into<String>, data: T) -> Self {
        debug_assert!(code.is_success(), "success envelope with failure code {code}");
        Self {
            result_code: code,
            msg: msg.into(),
            data: Some(data),
        }
    }

    /// Failure, never carries data
    pub fn failure(code: ResultCode, msg: impl Into<String>) -> Self {
        debug_assert!(!code.is_success(), "failure envelope with success code {code}");
        Self {
            result_code: code,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn result_code(&self) -> ResultCode {
        self.result_code
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn is_success(&self) -> bool {
        self.result_code.is_success()
    }
}

/// Access/refresh token pair issued on a successful login
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Username/password pair posted by clients
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct CredentialsBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsBody {
    /// Name of the first blank field, if any
    pub fn blank_field(&self) -> Option<&'static str> {
        if self.username.trim().is_empty() {
            Some("username")
        } else if self.password.trim().is_empty() {
            Some("password")
        } else {
            None
        }
    }
}

impl fmt::Debug for CredentialsBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsBody")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity echoed back by the credential check and join endpoints
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MemberBody {
    pub username: String,
}
