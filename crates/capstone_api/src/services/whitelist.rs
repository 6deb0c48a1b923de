//! Whitelist and reviewer endpoints.

use std::sync::Arc;

use serde_json::json;

use capstone_domain::Whitelist;

use super::{fetch, send};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

#[derive(Clone)]
pub struct WhitelistService {
    transport: Arc<dyn Transport>,
}

impl WhitelistService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn by_role(&self, role_id: i64) -> ApiResult<Vec<Whitelist>> {
        let path = format!("/whitelist/role/{}", role_id);
        fetch(self.transport.as_ref(), ApiRequest::get(path)).await
    }

    pub async fn set_reviewer(&self, whitelist_id: i64, is_reviewer: bool) -> ApiResult<()> {
        let path = format!("/whitelist/update-reviewer-status/{}", whitelist_id);
        let request = ApiRequest::put(path).json(&json!({ "isReviewer": is_reviewer }))?;
        send(self.transport.as_ref(), request).await
    }
}
