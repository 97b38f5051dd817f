//! Login results and session token issuance.

use chrono::Utc;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::params::LoginRequest;

pub const ERRNO_OK: i32 = 0;
pub const ERRNO_SIGNATURE: i32 = -1;
pub const ERRNO_PARAMETER: i32 = -2;

const AUTH_KEY_BYTES: usize = 12;

/// Session payload. Every field is present on success and absent on failure.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    // `Some(0)` must serialize as `"zone": 0`, never be dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<i32>,
    #[serde(rename = "extraInfo", skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub errno: i32,
    pub errmsg: String,
    pub data: LoginData,
}

impl LoginResult {
    #[must_use]
    pub fn error(errno: i32, errmsg: &str) -> Self {
        Self {
            errno,
            errmsg: errmsg.to_string(),
            data: LoginData::default(),
        }
    }

    #[must_use]
    pub fn parameter_error() -> Self {
        Self::error(ERRNO_PARAMETER, "parameter error")
    }

    #[must_use]
    pub fn signature_error() -> Self {
        Self::error(ERRNO_SIGNATURE, "signature error")
    }
}

/// Build the success result for a verified login.
#[must_use]
pub fn issue(request: &LoginRequest) -> LoginResult {
    LoginResult {
        errno: ERRNO_OK,
        errmsg: "success".to_string(),
        data: LoginData {
            uid: Some(request.qid.to_string()),
            auth_key: Some(auth_key()),
            zone: Some(0),
            extra_info: Some(Utc::now().timestamp().to_string()),
        },
    }
}

/// 12 bytes from the OS CSPRNG as 24 lowercase hex chars.
#[must_use]
pub fn auth_key() -> String {
    let mut bytes = [0u8; AUTH_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
