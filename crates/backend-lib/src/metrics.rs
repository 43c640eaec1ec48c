// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_REJECTED: &str = "auth.login.rejected";
pub const MEMBER_JOINED: &str = "member.joined";
