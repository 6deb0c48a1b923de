//! Semester endpoints.

use std::sync::Arc;

use tracing::info;

use capstone_domain::{Semester, SemesterDraft};

use super::{fetch, send};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

#[derive(Clone)]
pub struct SemesterService {
    transport: Arc<dyn Transport>,
}

impl SemesterService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> ApiResult<Vec<Semester>> {
        fetch(self.transport.as_ref(), ApiRequest::get("/semester")).await
    }

    pub async fn get(&self, semester_id: i64) -> ApiResult<Semester> {
        let path = format!("/semester/{}", semester_id);
        fetch(self.transport.as_ref(), ApiRequest::get(path)).await
    }

    pub async fn create(&self, draft: &SemesterDraft) -> ApiResult<Semester> {
        let request = ApiRequest::post("/semester").json(draft)?;
        let semester: Semester = fetch(self.transport.as_ref(), request).await?;
        info!("Created semester {} ({})", semester.semester_code, semester.semester_id);
        Ok(semester)
    }

    pub async fn update(&self, semester_id: i64, draft: &SemesterDraft) -> ApiResult<Semester> {
        let request = ApiRequest::put(format!("/semester/{}", semester_id)).json(draft)?;
        fetch(self.transport.as_ref(), request).await
    }

    /// Start a semester. The backend ends any other active semester.
    pub async fn start(&self, semester_id: i64) -> ApiResult<()> {
        let path = format!("/semester/{}/start", semester_id);
        send(self.transport.as_ref(), ApiRequest::post(path)).await?;
        info!("Started semester {}", semester_id);
        Ok(())
    }

    pub async fn end(&self, semester_id: i64) -> ApiResult<()> {
        let path = format!("/semester/{}/end", semester_id);
        send(self.transport.as_ref(), ApiRequest::post(path)).await?;
        info!("Ended semester {}", semester_id);
        Ok(())
    }
}
