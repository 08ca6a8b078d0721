//! GitHub App authentication: a short-lived RS256 JWT signed with the App's
//! private key, exchanged for an installation access token.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::error::{MeasureError, Result};

/// Backdate `iat` to tolerate clock drift against GitHub.
const CLOCK_DRIFT_SECS: u64 = 60;
/// GitHub rejects App JWTs that live longer than ten minutes.
const JWT_LIFETIME_SECS: u64 = 9 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct Claims {
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
}

#[derive(Deserialize)]
pub(super) struct InstallationToken {
    pub token: String,
}

pub(super) fn sign_jwt(app_id: u64, private_key_pem: &str, now: u64) -> Result<String> {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())?;
    let claims = Claims {
        iat: now.saturating_sub(CLOCK_DRIFT_SECS),
        exp: now + JWT_LIFETIME_SECS,
        iss: app_id.to_string(),
    };
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
}

pub(super) fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| MeasureError::Config(format!("system clock is before the Unix epoch: {e}")))
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
