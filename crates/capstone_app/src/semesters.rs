//! Semester administration.
//!
//! Drafts are validated locally before anything is sent; an invalid draft
//! never reaches the backend. Lifecycle transitions (start, end) ask for
//! confirmation first.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use capstone_api::PortalClient;
use capstone_domain::{
    today, DomainError, Role, Semester, SemesterDraft, SemesterStatus, SemesterValidator,
};

use crate::confirm::{Confirm, Prompt};
use crate::error::{AppError, AppResult};
use crate::submit::InFlight;

const MANAGER_ROLES: [Role; 2] = [Role::Admin, Role::Moderator];

/// A semester with its derived status.
#[derive(Debug, Clone, PartialEq)]
pub struct SemesterRow {
    pub semester: Semester,
    pub status: SemesterStatus,
}

/// Listing plus anything the user should be warned about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemesterOverview {
    pub rows: Vec<SemesterRow>,
    pub warnings: Vec<String>,
}

impl SemesterOverview {
    pub fn active(&self) -> Option<&Semester> {
        self.rows
            .iter()
            .map(|r| &r.semester)
            .find(|s| s.is_active)
    }
}

/// Build the overview for `semesters` as of `today`.
pub fn overview_on(semesters: Vec<Semester>, today: NaiveDate) -> SemesterOverview {
    let warnings = active_semester_warning(&semesters).into_iter().collect();
    let rows = semesters
        .into_iter()
        .map(|semester| SemesterRow {
            status: semester.status_on(today),
            semester,
        })
        .collect();

    SemesterOverview { rows, warnings }
}

/// The backend keeps a single active semester. Warn if a listing says otherwise.
pub fn active_semester_warning(semesters: &[Semester]) -> Option<String> {
    let active: Vec<&str> = semesters
        .iter()
        .filter(|s| s.is_active)
        .map(|s| s.semester_code.as_str())
        .collect();

    (active.len() > 1).then(|| {
        format!(
            "More than one semester is marked active: {}.",
            active.join(", ")
        )
    })
}

/// Confirmation text for starting `target` while `current` is active.
pub fn start_prompt(target: &Semester, current: Option<&Semester>) -> Prompt {
    let message = match current {
        Some(current) if current.semester_id != target.semester_id => format!(
            "Start {}? The currently active semester {} will be ended.",
            target.semester_code, current.semester_code
        ),
        _ => format!("Start {}?", target.semester_code),
    };
    Prompt::new("Start semester", message)
}

pub struct SemesterManager {
    client: Arc<PortalClient>,
    confirm: Arc<dyn Confirm>,
    submitting: InFlight,
}

impl SemesterManager {
    pub fn new(client: Arc<PortalClient>, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            client,
            confirm,
            submitting: InFlight::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_active()
    }

    pub async fn overview(&self) -> AppResult<SemesterOverview> {
        self.client.require_session()?;
        let semesters = self.client.semesters().list().await?;
        let overview = overview_on(semesters, today());
        for warning in &overview.warnings {
            warn!("{}", warning);
        }
        Ok(overview)
    }

    pub async fn get(&self, semester_id: i64) -> AppResult<SemesterRow> {
        self.client.require_session()?;
        let semester = self.client.semesters().get(semester_id).await?;
        Ok(SemesterRow {
            status: semester.status(),
            semester,
        })
    }

    pub async fn create(&self, draft: &SemesterDraft) -> AppResult<Semester> {
        let draft = validated(draft)?;
        self.client.require_role(&MANAGER_ROLES)?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        let created = self.client.semesters().create(&draft).await?;
        info!("Created semester {}", created.semester_code);
        Ok(created)
    }

    /// Update `current` with `draft`. Semesters closed with End are read-only.
    pub async fn update(&self, current: &Semester, draft: &SemesterDraft) -> AppResult<Semester> {
        let draft = validated(draft)?;
        if !current.is_editable() {
            return Err(DomainError::SemesterLocked(current.semester_code.clone()).into());
        }
        self.client.require_role(&MANAGER_ROLES)?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        let updated = self
            .client
            .semesters()
            .update(current.semester_id, &draft)
            .await?;
        info!("Updated semester {}", updated.semester_code);
        Ok(updated)
    }

    /// Start an upcoming semester. `active` is the semester currently running,
    /// if any; the backend ends it.
    pub async fn start(&self, target: &Semester, active: Option<&Semester>) -> AppResult<()> {
        if !target.can_start_on(today()) {
            return Err(AppError::NotAllowed(format!(
                "Only upcoming semesters can be started; {} is {}.",
                target.semester_code,
                target.status()
            )));
        }
        self.client.require_role(&MANAGER_ROLES)?;

        if !self.confirm.confirm(&start_prompt(target, active)) {
            return Err(AppError::Cancelled);
        }

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        self.client.semesters().start(target.semester_id).await?;
        info!("Started semester {}", target.semester_code);
        Ok(())
    }

    pub async fn end(&self, target: &Semester) -> AppResult<()> {
        if !target.can_end() {
            return Err(AppError::NotAllowed(format!(
                "Semester {} is not active.",
                target.semester_code
            )));
        }
        self.client.require_role(&MANAGER_ROLES)?;

        let prompt = Prompt::new(
            "End semester",
            format!("End {}? This cannot be undone.", target.semester_code),
        )
        .destructive();
        if !self.confirm.confirm(&prompt) {
            return Err(AppError::Cancelled);
        }

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        self.client.semesters().end(target.semester_id).await?;
        info!("Ended semester {}", target.semester_code);
        Ok(())
    }
}

fn validated(draft: &SemesterDraft) -> AppResult<SemesterDraft> {
    let result = SemesterValidator::validate_draft(draft);
    if !result.valid {
        warn!("Semester draft rejected: {:?}", result.errors);
        return Err(AppError::Validation(result.errors));
    }
    Ok(draft.normalized())
}
