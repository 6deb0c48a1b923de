//! Login endpoint.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use capstone_domain::{LoginRequest, User};

use super::fetch;
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

/// Session JWT plus the user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Exchange a Google ID token and campus for a portal session.
    pub async fn login(&self, id_token: &str, campus_id: i64) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            id_token: id_token.to_string(),
            campus_id,
        };
        let request = ApiRequest::post("/Auth/login").json(&body)?;
        let response: LoginResponse = fetch(self.transport.as_ref(), request).await?;
        info!("Signed in as {}", response.user.email);
        Ok(response)
    }
}
