//! Request payloads sent to the backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::models::Semester;

/// Create/update form for a semester.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SemesterDraft {
    pub semester_code: String,
    pub semester_name: String,
    #[serde(with = "dates")]
    pub start_date: NaiveDate,
    #[serde(with = "dates")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_active: bool,
}

impl SemesterDraft {
    /// Trimmed copy with the code upper-cased, as submitted.
    pub fn normalized(&self) -> Self {
        Self {
            semester_code: self.semester_code.trim().to_ascii_uppercase(),
            semester_name: self.semester_name.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
        }
    }

    /// Pre-fill an edit form from an existing semester.
    ///
    /// A semester without an end date gets `start_date` as its end, which the
    /// date-range rule rejects until the user picks a real one.
    pub fn from_semester(semester: &Semester) -> Self {
        Self {
            semester_code: semester.semester_code.clone(),
            semester_name: semester.semester_name.clone(),
            start_date: semester.start_date,
            end_date: semester.end_date.unwrap_or(semester.start_date),
            is_active: semester.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub id_token: String,
    pub campus_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamDraft {
    pub team_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_avatar: Option<String>,
}

/// Invite a student by code or email. At least one must be set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    pub team_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Metadata part of a thesis proposal; the file travels separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThesisProposal {
    pub title: String,
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThesisUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDraft {
    pub title: String,
    pub content: String,
    pub display_order: i32,
}

/// File attached to a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_normalized() {
        let draft = SemesterDraft {
            semester_code: " fa24 ".into(),
            semester_name: " Fall 2024 ".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            is_active: false,
        };
        let normalized = draft.normalized();
        assert_eq!(normalized.semester_code, "FA24");
        assert_eq!(normalized.semester_name, "Fall 2024");
    }

    #[test]
    fn test_upload_content_type() {
        assert_eq!(Upload::new("thesis.PDF", vec![]).content_type, "application/pdf");
        assert_eq!(
            Upload::new("notes.bin", vec![]).content_type,
            "application/octet-stream"
        );
    }
}
