//! # capstone_app
//!
//! Headless portal workflows on top of [`capstone_api`].
//!
//! Each workflow owns the checks that run before a request is sent (form
//! validation, roster guards, role gates, confirmation prompts, the
//! in-flight flag) and the local state that changes after one returns.
//!
//! - [`SemesterManager`]: list with derived status, create/update, start/end
//! - [`TeamWorkspace`]: my team, roster actions
//! - [`InvitationBoard`]: received invitations and the leader's invite toggle
//! - [`StudentSearch`]: debounced student lookup
//! - [`ThesisWorkspace`]: proposal and versioned uploads
//! - [`ChecklistBoard`], [`ReviewerManager`]: review setup

pub mod checklist;
pub mod confirm;
pub mod error;
pub mod invitations;
pub mod notice;
pub mod reviewers;
pub mod search;
pub mod semesters;
pub mod submit;
pub mod team;
pub mod thesis;

pub use checklist::ChecklistBoard;
pub use confirm::{AutoConfirm, Confirm, Prompt};
pub use error::{AppError, AppResult};
pub use invitations::InvitationBoard;
pub use notice::{Notice, NoticeLevel};
pub use reviewers::ReviewerManager;
pub use search::{Debouncer, SearchState, StudentSearch, SEARCH_DEBOUNCE};
pub use semesters::{SemesterManager, SemesterOverview, SemesterRow};
pub use submit::{InFlight, InFlightGuard};
pub use team::TeamWorkspace;
pub use thesis::ThesisWorkspace;

use capstone_api::PortalClient;

/// Id of the signed-in user.
pub(crate) fn current_user_id(client: &PortalClient) -> AppResult<i64> {
    client
        .require_session()?
        .user_id()
        .ok_or_else(|| AppError::NotAllowed("Your session does not identify a user.".to_string()))
}
