use std::sync::Arc;

use capstone_domain::UserSummary;

use super::fetch;
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

#[derive(Clone)]
pub struct UserService {
    transport: Arc<dyn Transport>,
}

impl UserService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Look up students by name, code or email.
    pub async fn search(&self, keyword: &str) -> ApiResult<Vec<UserSummary>> {
        let request = ApiRequest::get("/users/search").query("keyword", keyword);
        fetch(self.transport.as_ref(), request).await
    }
}
