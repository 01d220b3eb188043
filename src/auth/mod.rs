//! Session tokens and the per-request team identity.
//!
//! Sessions are HS256 JWTs carrying the user id (`sub`) and the team id.
//! They arrive either as `Authorization: Bearer <token>` or in the
//! `hc_session` cookie. Every `/api/v1` handler takes a [`TeamContext`],
//! which rejects the request with 401 when no valid session is present.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::domain::{TeamId, UserId};
use crate::error::TrackerError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "hc_session";

/// Session token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user.
    pub sub: UserId,
    /// The user's team.
    pub team_id: TeamId,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// Keys derived from `secret`, issuing tokens valid for `ttl_secs`.
    #[must_use]
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Issues a session token for `user_id` in `team_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Internal`] if signing fails.
    pub fn issue(
        &self,
        user_id: UserId,
        team_id: TeamId,
        now: DateTime<Utc>,
    ) -> Result<String, TrackerError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: user_id,
            team_id,
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TrackerError::Internal(format!("failed to sign session: {e}")))
    }

    /// Verifies a token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Unauthorized`] for any invalid token.
    pub fn verify(&self, token: &str) -> Result<Claims, TrackerError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TrackerError::Unauthorized(format!("invalid session: {e}")))
    }
}

/// The authenticated caller. All data access is scoped to `team_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamContext {
    /// Acting user.
    pub user_id: UserId,
    /// The user's team.
    pub team_id: TeamId,
}

impl From<Claims> for TeamContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            team_id: claims.team_id,
        }
    }
}

/// Finds the session token in the request: bearer header first, then cookie.
fn session_token(parts: &Parts) -> Option<&str> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
        })
}

impl FromRequestParts<AppState> for TeamContext {
    type Rejection = TrackerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)
            .ok_or_else(|| TrackerError::Unauthorized("authentication required".to_string()))?;
        let claims = state.session_keys.verify(token)?;
        Ok(claims.into())
    }
}
