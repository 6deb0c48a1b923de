//! Thesis proposal and versioned uploads.

use std::sync::Arc;

use tracing::{info, warn};

use capstone_api::PortalClient;
use capstone_domain::{Role, Thesis, ThesisProposal, ThesisUpdate, Upload, ValidationResult};

use crate::error::{AppError, AppResult};
use crate::submit::InFlight;

/// Document types the backend accepts.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn validate_proposal(proposal: &ThesisProposal, file: &Upload) -> ValidationResult {
    let mut result = ValidationResult::new();
    if proposal.title.trim().is_empty() {
        result.add_error("Title is required.");
    }
    if proposal.short_description.trim().is_empty() {
        result.add_error("Short description is required.");
    }
    result.merge(validate_upload(file));
    result
}

pub fn validate_upload(file: &Upload) -> ValidationResult {
    let mut result = ValidationResult::new();
    let extension = file
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => result.add_error(format!(
            "{} is not a supported document. Upload a PDF or Word file.",
            file.file_name
        )),
    }
    if file.bytes.is_empty() {
        result.add_error("The selected file is empty.");
    } else if file.bytes.len() > MAX_UPLOAD_BYTES {
        result.add_error("The selected file is larger than 20 MB.");
    }
    result
}

pub struct ThesisWorkspace {
    client: Arc<PortalClient>,
    submitting: InFlight,
}

impl ThesisWorkspace {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self {
            client,
            submitting: InFlight::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_active()
    }

    /// The signed-in student's thesis, `None` if they have not proposed one.
    pub async fn mine(&self) -> AppResult<Option<Thesis>> {
        self.client.require_session()?;
        Ok(self.client.theses().my_thesis().await?)
    }

    pub async fn list(&self, semester_id: Option<i64>) -> AppResult<Vec<Thesis>> {
        self.client.require_session()?;
        Ok(self.client.theses().list(semester_id).await?)
    }

    pub async fn get(&self, thesis_id: i64) -> AppResult<Thesis> {
        self.client.require_session()?;
        Ok(self.client.theses().get(thesis_id).await?)
    }

    pub async fn propose(&self, proposal: &ThesisProposal, file: Upload) -> AppResult<Thesis> {
        let result = validate_proposal(proposal, &file);
        if !result.valid {
            return Err(AppError::Validation(result.errors));
        }
        self.client.require_role(&[Role::Student])?;

        let proposal = ThesisProposal {
            title: proposal.title.trim().to_string(),
            short_description: proposal.short_description.trim().to_string(),
            team_id: proposal.team_id,
        };

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        let thesis = self.client.theses().propose(&proposal, file).await?;
        info!("Proposed thesis {} ({})", thesis.thesis_id, thesis.title);
        Ok(thesis)
    }

    pub async fn update(&self, thesis: &Thesis, update: &ThesisUpdate) -> AppResult<Thesis> {
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::Validation(vec!["Title is required.".to_string()]));
        }
        self.client.require_session()?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        Ok(self.client.theses().update(thesis.thesis_id, update).await?)
    }

    /// Upload a new version. Only students may re-upload, and only while the
    /// thesis is neither published nor rejected.
    pub async fn upload_version(
        &self,
        thesis: &Thesis,
        file: Upload,
        note: Option<&str>,
    ) -> AppResult<Thesis> {
        let result = validate_upload(&file);
        if !result.valid {
            return Err(AppError::Validation(result.errors));
        }

        let session = self.client.require_session()?;
        if !thesis.can_reupload(session.roles()) {
            warn!(
                "Refused upload for thesis {} in status {}",
                thesis.thesis_id, thesis.status
            );
            return Err(AppError::NotAllowed(format!(
                "A new version cannot be uploaded while the thesis is {}.",
                thesis.status
            )));
        }

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        let note = note.map(str::trim).filter(|n| !n.is_empty());
        let updated = self
            .client
            .theses()
            .upload_version(thesis.thesis_id, file, note)
            .await?;
        info!(
            "Uploaded version {} of thesis {}",
            updated.current_version_number().unwrap_or_default(),
            updated.thesis_id
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposal_requires_fields() {
        let proposal = ThesisProposal {
            title: " ".into(),
            short_description: String::new(),
            team_id: None,
        };
        let result = validate_proposal(&proposal, &Upload::new("p.pdf", b"x".to_vec()));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_upload_extension() {
        assert!(validate_upload(&Upload::new("v2.DOCX", b"x".to_vec())).valid);
        assert!(!validate_upload(&Upload::new("v2.zip", b"x".to_vec())).valid);
        assert!(!validate_upload(&Upload::new("noext", b"x".to_vec())).valid);
        assert!(!validate_upload(&Upload::new("empty.pdf", Vec::new())).valid);
    }
}
