use std::sync::Arc;

use capstone_domain::Campus;

use super::fetch;
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

#[derive(Clone)]
pub struct CampusService {
    transport: Arc<dyn Transport>,
}

impl CampusService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> ApiResult<Vec<Campus>> {
        fetch(self.transport.as_ref(), ApiRequest::get("/campus")).await
    }
}
