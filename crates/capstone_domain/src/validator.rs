//! Semester form validation.
//!
//! Runs before any create or update request. A draft that fails here never
//! reaches the network.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::requests::SemesterDraft;

/// Shown when the date range is empty or inverted.
pub const DATE_ORDER_MESSAGE: &str = "End date must be after start date.";

const CODE_PATTERN: &str = r"^(SP|SU|FA)\d{2}$";

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CODE_PATTERN).expect("semester code pattern is valid"))
}

/// Validation result with details.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// First error, for single-line alerts.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Academic season encoded in the first two letters of a semester code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Season for a code prefix, case-insensitive. `None` for anything else.
    pub fn from_code(code: &str) -> Option<Season> {
        let prefix = code.trim().get(..2)?.to_ascii_uppercase();
        match prefix.as_str() {
            "SP" => Some(Season::Spring),
            "SU" => Some(Season::Summer),
            "FA" => Some(Season::Fall),
            _ => None,
        }
    }

    /// Lower-case keyword the semester name must contain.
    pub fn keyword(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validator for semester drafts.
pub struct SemesterValidator;

impl SemesterValidator {
    /// Validate a whole draft. The draft is normalized first.
    ///
    /// `validate_season` skips prefixes outside SP/SU/FA, but
    /// `validate_code_pattern` still rejects them, so such codes never pass.
    pub fn validate_draft(draft: &SemesterDraft) -> ValidationResult {
        let draft = draft.normalized();
        let mut result = ValidationResult::new();

        result.merge(Self::validate_required(&draft));
        if !result.valid {
            return result;
        }

        result.merge(Self::validate_season(&draft.semester_code, &draft.semester_name));
        result.merge(Self::validate_code_pattern(&draft.semester_code));
        result.merge(Self::validate_dates(draft.start_date, draft.end_date));

        result
    }

    pub fn validate_required(draft: &SemesterDraft) -> ValidationResult {
        let mut result = ValidationResult::new();

        if draft.semester_code.trim().is_empty() {
            result.add_error("Semester code is required.");
        }
        if draft.semester_name.trim().is_empty() {
            result.add_error("Semester name is required.");
        }

        result
    }

    /// The code must read like `SP25`, `SU25` or `FA25`.
    pub fn validate_code_pattern(code: &str) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !code_regex().is_match(code) {
            result.add_error(format!(
                "Semester code \"{}\" must be SP, SU or FA followed by two digits (e.g. FA24).",
                code
            ));
        }

        result
    }

    /// The name must mention the season implied by the code prefix.
    ///
    /// Prefixes outside SP/SU/FA are not cross-checked here.
    pub fn validate_season(code: &str, name: &str) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(season) = Season::from_code(code) {
            if !name.to_lowercase().contains(season.keyword()) {
                result.add_error(format!(
                    "Semester code {} is a {} semester, so the name must contain \"{}\".",
                    code.trim(),
                    season,
                    season.label()
                ));
            }
        }

        result
    }

    pub fn validate_dates(start_date: NaiveDate, end_date: NaiveDate) -> ValidationResult {
        let mut result = ValidationResult::new();

        if end_date <= start_date {
            result.add_error(DATE_ORDER_MESSAGE);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_season_match_case_insensitive() {
        assert!(SemesterValidator::validate_season("FA24", "Fall 2024").valid);
        assert!(SemesterValidator::validate_season("fa24", "FALL term").valid);
        assert!(SemesterValidator::validate_season("SP25", "spring 2025").valid);
        assert!(SemesterValidator::validate_season("SU25", "Summer 2025").valid);
    }

    #[test]
    fn test_season_mismatch_names_keyword() {
        let result = SemesterValidator::validate_season("FA24", "Autumn 2024");
        assert!(!result.valid);
        assert!(result.errors[0].contains("Fall"));

        let result = SemesterValidator::validate_season("SU24", "Spring 2024");
        assert!(!result.valid);
        assert!(result.errors[0].contains("Summer"));
    }

    #[test]
    fn test_unknown_prefix_skips_season_check() {
        assert!(SemesterValidator::validate_season("WI24", "Anything").valid);
        assert!(SemesterValidator::validate_season("W", "Anything").valid);
    }

    #[test]
    fn test_unknown_prefix_fails_pattern() {
        assert!(!SemesterValidator::validate_code_pattern("WI24").valid);
        assert!(!SemesterValidator::validate_code_pattern("FA2024").valid);
        assert!(SemesterValidator::validate_code_pattern("SU09").valid);
    }

    #[test]
    fn test_date_order() {
        let start = d(2024, 9, 1);
        assert!(!SemesterValidator::validate_dates(start, start).valid);
        assert!(!SemesterValidator::validate_dates(start, d(2024, 8, 31)).valid);
        assert!(SemesterValidator::validate_dates(start, d(2024, 9, 2)).valid);
        assert_eq!(
            SemesterValidator::validate_dates(start, start).first_error(),
            Some(DATE_ORDER_MESSAGE)
        );
    }

    #[test]
    fn test_required_fields_short_circuit() {
        let draft = SemesterDraft {
            semester_code: "  ".into(),
            semester_name: String::new(),
            start_date: d(2024, 9, 1),
            end_date: d(2024, 1, 1),
            is_active: false,
        };
        let result = SemesterValidator::validate_draft(&draft);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
    }
}
