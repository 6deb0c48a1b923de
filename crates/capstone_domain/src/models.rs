//! Data models mirrored from the portal backend.
//!
//! Field names follow the backend's camelCase JSON. Collections and counters
//! default to empty/zero because list endpoints omit them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;

/// One academic term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub semester_id: i64,
    pub semester_code: String,
    pub semester_name: String,
    #[serde(with = "dates")]
    pub start_date: NaiveDate,
    #[serde(with = "dates::option", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub team_count: u32,
    #[serde(default)]
    pub whitelist_count: u32,
    #[serde(default)]
    pub teams: Vec<TeamSimple>,
    #[serde(default)]
    pub whitelists: Vec<Whitelist>,
}

/// Team summary nested in a semester.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamSimple {
    pub team_id: i64,
    pub team_code: String,
    pub team_name: String,
    #[serde(default)]
    pub member_count: u32,
}

/// A pre-approved participant for a semester.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Whitelist {
    pub whitelist_id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role_id: i64,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub semester_id: Option<i64>,
    #[serde(default)]
    pub is_reviewer: bool,
}

/// Role of a member inside a team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MemberRole {
    Leader,
    #[default]
    Member,
}

/// A student in a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: i64,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub student_code: Option<String>,
    #[serde(default)]
    pub role: MemberRole,
}

/// A group of students working on one thesis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: i64,
    pub team_code: String,
    pub team_name: String,
    #[serde(default)]
    pub team_avatar: Option<String>,
    pub leader_id: i64,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub topic_id: Option<i64>,
    #[serde(default)]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub semester_id: Option<i64>,
}

/// Invitation state as reported by the backend.
///
/// `Cancelled` is a client-side terminal state: the backend deletes cancelled
/// invitations, so it only appears in local bookkeeping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

/// A pending request for a user to join a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamInvitation {
    pub invitation_id: i64,
    pub team_id: i64,
    #[serde(default)]
    pub team_name: Option<String>,
    pub invited_by: i64,
    #[serde(default)]
    pub invited_by_name: Option<String>,
    #[serde(default)]
    pub invitee_id: Option<i64>,
    #[serde(default)]
    pub status: InvitationStatus,
}

/// Thesis workflow status. Transitions are decided by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ThesisStatus {
    Registered,
    Reviewing,
    #[serde(rename = "Need Update", alias = "NeedUpdate")]
    NeedUpdate,
    Updated,
    Published,
    Rejected,
}

impl ThesisStatus {
    /// Published and rejected theses accept no further uploads.
    pub fn is_final(&self) -> bool {
        matches!(self, ThesisStatus::Published | ThesisStatus::Rejected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThesisStatus::Registered => "Registered",
            ThesisStatus::Reviewing => "Reviewing",
            ThesisStatus::NeedUpdate => "Need Update",
            ThesisStatus::Updated => "Updated",
            ThesisStatus::Published => "Published",
            ThesisStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ThesisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One uploaded version of a thesis document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThesisHistory {
    #[serde(default)]
    pub history_id: Option<i64>,
    pub version_number: u32,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A proposed or registered research document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thesis {
    pub thesis_id: i64,
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    pub status: ThesisStatus,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub semester_id: Option<i64>,
    #[serde(default)]
    pub histories: Vec<ThesisHistory>,
}

/// An evaluation criterion used during review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub checklist_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_completed: bool,
}

/// Portal-wide roles carried in the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin,
    Moderator,
    Lecturer,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Moderator => "Moderator",
            Role::Lecturer => "Lecturer",
            Role::Student => "Student",
        }
    }

    /// Parse a role claim, case-insensitively.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "moderator" => Some(Role::Moderator),
            "lecturer" | "supervisor" => Some(Role::Lecturer),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of the signed-in user, cached next to the session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub student_code: Option<String>,
    #[serde(default)]
    pub campus_id: Option<i64>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Student search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub student_code: Option<String>,
    #[serde(default)]
    pub has_team: bool,
}

/// Campus option offered at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campus {
    pub campus_id: i64,
    pub campus_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_semester_from_backend_json() {
        let semester: Semester = serde_json::from_value(json!({
            "semesterId": 7,
            "semesterCode": "FA24",
            "semesterName": "Fall 2024",
            "startDate": "2024-09-01T00:00:00",
            "endDate": "2024-12-31",
            "isActive": true,
            "teamCount": 4
        }))
        .unwrap();

        assert_eq!(semester.semester_id, 7);
        assert_eq!(semester.start_date, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        assert_eq!(semester.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert!(semester.is_active);
        assert!(!semester.is_archived);
        assert_eq!(semester.team_count, 4);
        assert!(semester.teams.is_empty());
    }

    #[test]
    fn test_thesis_status_labels() {
        let status: ThesisStatus = serde_json::from_value(json!("Need Update")).unwrap();
        assert_eq!(status, ThesisStatus::NeedUpdate);
        assert_eq!(status.to_string(), "Need Update");
        assert_eq!(serde_json::to_value(status).unwrap(), json!("Need Update"));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("STUDENT"), Some(Role::Student));
        assert_eq!(Role::parse(" admin "), Some(Role::Admin));
        assert_eq!(Role::parse("janitor"), None);
    }
}
