//! Thesis endpoints, including multipart uploads.

use std::sync::Arc;

use tracing::info;

use capstone_domain::{Thesis, ThesisProposal, ThesisUpdate, Upload};

use super::{fetch, fetch_optional};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, MultipartForm, Transport};

#[derive(Clone)]
pub struct ThesisService {
    transport: Arc<dyn Transport>,
}

impl ThesisService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, semester_id: Option<i64>) -> ApiResult<Vec<Thesis>> {
        let mut request = ApiRequest::get("/thesis");
        if let Some(id) = semester_id {
            request = request.query("semesterId", id);
        }
        fetch(self.transport.as_ref(), request).await
    }

    /// The caller's thesis. `None` when nothing has been proposed yet.
    pub async fn my_thesis(&self) -> ApiResult<Option<Thesis>> {
        fetch_optional(self.transport.as_ref(), ApiRequest::get("/thesis/my")).await
    }

    pub async fn get(&self, thesis_id: i64) -> ApiResult<Thesis> {
        fetch(self.transport.as_ref(), ApiRequest::get(format!("/thesis/{}", thesis_id))).await
    }

    pub async fn propose(&self, proposal: &ThesisProposal, file: Upload) -> ApiResult<Thesis> {
        let mut form = MultipartForm::new()
            .text("title", &proposal.title)
            .text("shortDescription", &proposal.short_description)
            .file("file", file);
        if let Some(team_id) = proposal.team_id {
            form = form.text("teamId", team_id.to_string());
        }

        let request = ApiRequest::post("/thesis/propose").multipart(form);
        let thesis: Thesis = fetch(self.transport.as_ref(), request).await?;
        info!("Proposed thesis {} ({})", thesis.title, thesis.thesis_id);
        Ok(thesis)
    }

    pub async fn update(&self, thesis_id: i64, update: &ThesisUpdate) -> ApiResult<Thesis> {
        let request = ApiRequest::put(format!("/thesis/{}", thesis_id)).json(update)?;
        fetch(self.transport.as_ref(), request).await
    }

    /// Upload a new version. The backend appends a history entry.
    pub async fn upload_version(
        &self,
        thesis_id: i64,
        file: Upload,
        note: Option<&str>,
    ) -> ApiResult<Thesis> {
        let mut form = MultipartForm::new().file("file", file);
        if let Some(note) = note {
            form = form.text("note", note);
        }

        let request = ApiRequest::post(format!("/thesis/{}/upload", thesis_id)).multipart(form);
        fetch(self.transport.as_ref(), request).await
    }
}
