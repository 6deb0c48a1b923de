//! Thesis version history.

use crate::models::{Role, Thesis, ThesisHistory};

impl Thesis {
    /// The highest version number wins, whatever order the list arrives in.
    pub fn current_version(&self) -> Option<&ThesisHistory> {
        self.histories.iter().max_by_key(|h| h.version_number)
    }

    pub fn current_version_number(&self) -> Option<u32> {
        self.current_version().map(|h| h.version_number)
    }

    /// Version number the next upload will get.
    pub fn next_version_number(&self) -> u32 {
        self.current_version_number().map_or(1, |v| v + 1)
    }

    /// Histories sorted newest first.
    pub fn histories_newest_first(&self) -> Vec<&ThesisHistory> {
        let mut sorted: Vec<_> = self.histories.iter().collect();
        sorted.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        sorted
    }

    /// File of the current version, falling back to the thesis file.
    pub fn current_file_url(&self) -> Option<&str> {
        self.current_version()
            .and_then(|h| h.file_url.as_deref())
            .or(self.file_url.as_deref())
    }

    /// Only students may upload a new version, and only while the thesis is
    /// still open.
    pub fn can_reupload<'a>(&self, roles: impl IntoIterator<Item = &'a str>) -> bool {
        let is_student = roles
            .into_iter()
            .any(|r| Role::parse(r) == Some(Role::Student));
        is_student && !self.status.is_final()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThesisStatus;

    fn history(v: u32) -> ThesisHistory {
        ThesisHistory {
            history_id: None,
            version_number: v,
            file_url: Some(format!("https://files/v{}.pdf", v)),
            note: None,
        }
    }

    fn thesis(versions: &[u32]) -> Thesis {
        Thesis {
            thesis_id: 1,
            title: "Lock-free queues".into(),
            short_description: None,
            status: ThesisStatus::Reviewing,
            owner_name: None,
            owner_email: None,
            file_url: Some("https://files/original.pdf".into()),
            team_id: None,
            semester_id: None,
            histories: versions.iter().copied().map(history).collect(),
        }
    }

    #[test]
    fn test_current_version_is_max_not_last() {
        let t = thesis(&[1, 3, 2]);
        assert_eq!(t.current_version_number(), Some(3));
        assert_eq!(t.next_version_number(), 4);
        assert_eq!(t.current_file_url(), Some("https://files/v3.pdf"));
    }

    #[test]
    fn test_no_history() {
        let t = thesis(&[]);
        assert_eq!(t.current_version_number(), None);
        assert_eq!(t.next_version_number(), 1);
        assert_eq!(t.current_file_url(), Some("https://files/original.pdf"));
    }

    #[test]
    fn test_newest_first() {
        let t = thesis(&[2, 1, 3]);
        let order: Vec<_> = t.histories_newest_first().iter().map(|h| h.version_number).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_reupload_gate() {
        let mut t = thesis(&[1]);
        assert!(t.can_reupload(["Student"]));
        assert!(!t.can_reupload(["Lecturer", "Admin"]));

        t.status = ThesisStatus::Published;
        assert!(!t.can_reupload(["Student"]));
    }
}
