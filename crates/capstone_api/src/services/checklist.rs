use std::sync::Arc;

use capstone_domain::{ChecklistDraft, ChecklistItem};

use super::{fetch, send};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

#[derive(Clone)]
pub struct ChecklistService {
    transport: Arc<dyn Transport>,
}

impl ChecklistService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> ApiResult<Vec<ChecklistItem>> {
        fetch(self.transport.as_ref(), ApiRequest::get("/checklist")).await
    }

    pub async fn get(&self, checklist_id: i64) -> ApiResult<ChecklistItem> {
        let path = format!("/checklist/{}", checklist_id);
        fetch(self.transport.as_ref(), ApiRequest::get(path)).await
    }

    pub async fn create(&self, draft: &ChecklistDraft) -> ApiResult<ChecklistItem> {
        let request = ApiRequest::post("/checklist").json(draft)?;
        fetch(self.transport.as_ref(), request).await
    }

    pub async fn update(&self, checklist_id: i64, draft: &ChecklistDraft) -> ApiResult<ChecklistItem> {
        let request = ApiRequest::put(format!("/checklist/{}", checklist_id)).json(draft)?;
        fetch(self.transport.as_ref(), request).await
    }

    pub async fn delete(&self, checklist_id: i64) -> ApiResult<()> {
        let path = format!("/checklist/{}", checklist_id);
        send(self.transport.as_ref(), ApiRequest::delete(path)).await
    }

    /// Flip the completion flag.
    pub async fn toggle(&self, checklist_id: i64) -> ApiResult<ChecklistItem> {
        let path = format!("/checklist/{}/toggle", checklist_id);
        fetch(self.transport.as_ref(), ApiRequest::put(path)).await
    }
}
