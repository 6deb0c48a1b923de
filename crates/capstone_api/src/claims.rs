//! Session token claim normalisation.
//!
//! The backend issues tokens whose claim names vary: roles may sit under the
//! short `role` key or the ASP.NET XML-namespace claim, as a string or an
//! array, and the user id may appear under several keys. This module folds
//! all of that into [`SessionClaims`].
//!
//! The client has no verification key, so the signature is not checked. The
//! backend verifies it on every request.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use capstone_domain::Role;

use crate::error::{ApiError, ApiResult};

pub const ROLE_CLAIM_URI: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
pub const NAME_ID_CLAIM_URI: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
pub const EMAIL_CLAIM_URI: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";

/// Role claim keys, highest precedence first. The first key present wins.
pub const ROLE_CLAIM_KEYS: [&str; 3] = ["role", "roles", ROLE_CLAIM_URI];

/// User id claim keys, highest precedence first. The first key holding an
/// integer wins.
pub const USER_ID_CLAIM_KEYS: [&str; 5] = ["userId", "UserId", "nameid", NAME_ID_CLAIM_URI, "sub"];

const EMAIL_CLAIM_KEYS: [&str; 2] = ["email", EMAIL_CLAIM_URI];

/// Normalised view of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionClaims {
    pub roles: BTreeSet<String>,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionClaims {
    /// Decode and normalise a token.
    pub fn decode(token: &str) -> ApiResult<Self> {
        let header = decode_header(token).map_err(|e| ApiError::InvalidToken(e.to_string()))?;

        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| ApiError::InvalidToken(e.to_string()))?;

        Ok(Self::from_payload(&data.claims))
    }

    /// Like [`SessionClaims::decode`], but a malformed token is simply no
    /// session.
    pub fn from_token(token: &str) -> Option<Self> {
        match Self::decode(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Ignoring unreadable session token: {}", e);
                None
            }
        }
    }

    pub fn from_payload(payload: &Value) -> Self {
        let roles = ROLE_CLAIM_KEYS
            .iter()
            .find_map(|key| payload.get(*key))
            .map(role_values)
            .unwrap_or_default();

        let user_id = USER_ID_CLAIM_KEYS
            .iter()
            .filter_map(|key| payload.get(*key))
            .find_map(as_i64);

        let email = EMAIL_CLAIM_KEYS
            .iter()
            .filter_map(|key| payload.get(*key))
            .find_map(|v| v.as_str().map(str::to_string));

        let expires_at = payload
            .get("exp")
            .and_then(as_i64)
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        Self {
            roles,
            user_id,
            email,
            expires_at,
        }
    }

    /// A token without an expiry is treated as already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| Role::parse(r) == Some(role))
    }

    /// Known roles, dropping anything unrecognised.
    pub fn known_roles(&self) -> BTreeSet<Role> {
        self.roles.iter().filter_map(|r| Role::parse(r)).collect()
    }
}

fn role_values(value: &Value) -> BTreeSet<String> {
    match value {
        Value::String(s) => [s.clone()].into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => BTreeSet::new(),
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(payload: Value) -> String {
        encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(b"backend-only-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_short_claims() {
        let claims = SessionClaims::decode(&token(json!({
            "role": "Student",
            "userId": "42",
            "email": "an@uni.edu",
            "exp": 4_102_444_800i64
        })))
        .unwrap();

        assert!(claims.has_role(Role::Student));
        assert_eq!(claims.user_id, Some(42));
        assert_eq!(claims.email.as_deref(), Some("an@uni.edu"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_namespaced_role_array() {
        let claims = SessionClaims::from_payload(&json!({
            ROLE_CLAIM_URI: ["Admin", "Lecturer"],
            NAME_ID_CLAIM_URI: 7
        }));

        assert_eq!(claims.roles.len(), 2);
        assert!(claims.has_role(Role::Admin));
        assert!(claims.has_role(Role::Lecturer));
        assert_eq!(claims.user_id, Some(7));
    }

    #[test]
    fn test_known_roles_drop_unrecognised() {
        let claims = SessionClaims::from_payload(&json!({
            "role": ["Supervisor", "janitor", "Admin"]
        }));

        assert_eq!(claims.roles.len(), 3);
        let known: Vec<Role> = claims.known_roles().into_iter().collect();
        assert_eq!(known, vec![Role::Admin, Role::Lecturer]);
    }

    #[test]
    fn test_user_id_precedence() {
        let claims = SessionClaims::from_payload(&json!({
            "sub": "google-oauth2|abc",
            "nameid": "15",
            "UserId": 9
        }));
        assert_eq!(claims.user_id, Some(9));

        let claims = SessionClaims::from_payload(&json!({ "sub": "not-a-number" }));
        assert_eq!(claims.user_id, None);
    }

    #[test]
    fn test_missing_exp_is_expired() {
        let claims = SessionClaims::from_payload(&json!({ "role": "Admin" }));
        assert!(claims.is_expired());
    }

    #[test]
    fn test_garbage_is_no_session() {
        assert!(SessionClaims::from_token("not.a.jwt").is_none());
        assert!(SessionClaims::from_token("").is_none());
    }
}
