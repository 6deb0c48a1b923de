//! Semester status derivation.
//!
//! The backend stores `isActive`, `isArchived` and the date range; the status
//! shown everywhere in the portal is derived from those on the client.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Semester;

/// Derived lifecycle status of a semester.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SemesterStatus {
    Ongoing,
    Upcoming,
    Ended,
}

impl fmt::Display for SemesterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SemesterStatus::Ongoing => "Ongoing",
            SemesterStatus::Upcoming => "Upcoming",
            SemesterStatus::Ended => "Ended",
        };
        f.write_str(label)
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve a semester status as of `today`.
///
/// The active flag always wins. A semester whose start date has passed but
/// was never activated stays `Upcoming` while its end date is still ahead.
pub fn resolve_status_on(
    is_active: bool,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_archived: bool,
    today: NaiveDate,
) -> SemesterStatus {
    if is_active {
        return SemesterStatus::Ongoing;
    }
    if is_archived {
        return SemesterStatus::Ended;
    }
    if start_date > today {
        return SemesterStatus::Upcoming;
    }
    match end_date {
        Some(end) if end > today => SemesterStatus::Upcoming,
        _ => SemesterStatus::Ended,
    }
}

/// Resolve a semester status against the local clock.
pub fn resolve_status(
    is_active: bool,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_archived: bool,
) -> SemesterStatus {
    resolve_status_on(is_active, start_date, end_date, is_archived, today())
}

impl Semester {
    pub fn status_on(&self, today: NaiveDate) -> SemesterStatus {
        resolve_status_on(
            self.is_active,
            self.start_date,
            self.end_date,
            self.is_archived,
            today,
        )
    }

    pub fn status(&self) -> SemesterStatus {
        self.status_on(today())
    }

    /// Only the End action locks a semester. A semester whose dates lapsed
    /// without ever being started stays editable so its dates can be fixed.
    pub fn is_editable(&self) -> bool {
        !self.is_archived
    }

    pub fn can_start_on(&self, today: NaiveDate) -> bool {
        self.status_on(today) == SemesterStatus::Upcoming
    }

    pub fn can_end(&self) -> bool {
        self.is_active
    }
}
