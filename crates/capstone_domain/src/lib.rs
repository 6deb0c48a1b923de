//! # capstone_domain
//!
//! Domain model and business rules for the capstone portal.
//!
//! Everything in this crate is pure: no I/O, no clock reads except where a
//! convenience wrapper says so explicitly. The backend owns the data; these
//! types describe the copies the client holds and the rules it enforces
//! before talking to the backend.
//!
//! ## Contents
//!
//! - **Models**: semesters, teams, invitations, theses, checklist items, users
//! - **Status**: semester status derivation (`Ongoing` / `Upcoming` / `Ended`)
//! - **Validation**: semester code, season keyword and date-range rules
//! - **Roster**: client-side authorization for kick/transfer/leave/disband
//! - **Thesis**: version history ordering and re-upload gating
//! - **Invitations**: invitation lifecycle and the invited-user map
//!
//! ## Example
//!
//! ```rust
//! use capstone_domain::{SemesterDraft, SemesterValidator};
//! use chrono::NaiveDate;
//!
//! let draft = SemesterDraft {
//!     semester_code: "FA24".into(),
//!     semester_name: "Autumn 2024".into(),
//!     start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//!     is_active: false,
//! };
//!
//! let result = SemesterValidator::validate_draft(&draft);
//! assert!(!result.valid);
//! assert!(result.errors[0].contains("Fall"));
//! ```

pub mod dates;
pub mod error;
pub mod invitation;
pub mod models;
pub mod requests;
pub mod roster;
pub mod status;
pub mod thesis;
pub mod validator;

pub use error::{DomainError, DomainResult};
pub use invitation::{InviteButton, InvitedUsers};
pub use models::*;
pub use requests::*;
pub use roster::{RosterAction, RosterDenied, RosterGuard, LEADER_LEAVE_MESSAGE};
pub use status::{resolve_status, resolve_status_on, today, SemesterStatus};
pub use validator::{Season, SemesterValidator, ValidationResult, DATE_ORDER_MESSAGE};
