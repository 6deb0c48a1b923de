//! Client-side authorization for team roster actions.
//!
//! These checks decide whether the portal offers an action and whether a
//! request is sent at all. The backend re-validates every one of them.

use thiserror::Error;

use crate::error::{DomainError, DomainResult};
use crate::models::{MemberRole, Team, TeamMember};

/// Shown when a leader tries to leave their own team.
pub const LEADER_LEAVE_MESSAGE: &str =
    "You are the team leader. Transfer leadership to another member before leaving the team.";

/// Action a user attempts on a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterAction {
    Edit,
    Invite,
    Kick { target: i64 },
    TransferLeadership { target: i64 },
    Leave,
    Disband,
}

impl RosterAction {
    pub fn name(&self) -> &'static str {
        match self {
            RosterAction::Edit => "edit",
            RosterAction::Invite => "invite",
            RosterAction::Kick { .. } => "kick",
            RosterAction::TransferLeadership { .. } => "transfer leadership",
            RosterAction::Leave => "leave",
            RosterAction::Disband => "disband",
        }
    }

    /// Destructive actions need explicit confirmation.
    pub fn needs_confirmation(&self) -> bool {
        matches!(
            self,
            RosterAction::Kick { .. }
                | RosterAction::TransferLeadership { .. }
                | RosterAction::Leave
                | RosterAction::Disband
        )
    }
}

/// Why an action was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterDenied {
    #[error("You are not a member of this team.")]
    NotMember,

    #[error("Only the team leader can {0}.")]
    NotLeader(&'static str),

    #[error("The team leader cannot be removed from the team.")]
    TargetIsLeader,

    #[error("You cannot {0} yourself.")]
    TargetIsSelf(&'static str),

    #[error("User {0} is not a member of this team.")]
    TargetNotMember(i64),

    #[error("{}", LEADER_LEAVE_MESSAGE)]
    LeaderCannotLeave,
}

/// Guard for roster actions.
pub struct RosterGuard;

impl RosterGuard {
    /// Check whether `actor` may perform `action` on `team`.
    pub fn check(team: &Team, actor: i64, action: RosterAction) -> Result<(), RosterDenied> {
        if team.member(actor).is_none() {
            return Err(RosterDenied::NotMember);
        }
        let actor_is_leader = team.is_leader(actor);

        match action {
            RosterAction::Edit | RosterAction::Invite | RosterAction::Disband => {
                if !actor_is_leader {
                    return Err(RosterDenied::NotLeader(action.name()));
                }
            }
            RosterAction::Kick { target } => {
                if !actor_is_leader {
                    return Err(RosterDenied::NotLeader(action.name()));
                }
                if target == actor {
                    return Err(RosterDenied::TargetIsSelf(action.name()));
                }
                if team.is_leader(target) {
                    return Err(RosterDenied::TargetIsLeader);
                }
                if team.member(target).is_none() {
                    return Err(RosterDenied::TargetNotMember(target));
                }
            }
            RosterAction::TransferLeadership { target } => {
                if !actor_is_leader {
                    return Err(RosterDenied::NotLeader(action.name()));
                }
                if target == actor {
                    return Err(RosterDenied::TargetIsSelf(action.name()));
                }
                if team.member(target).is_none() {
                    return Err(RosterDenied::TargetNotMember(target));
                }
            }
            RosterAction::Leave => {
                if actor_is_leader {
                    return Err(RosterDenied::LeaderCannotLeave);
                }
            }
        }

        Ok(())
    }

    /// Actions `actor` may currently take against `target`.
    pub fn available_against(team: &Team, actor: i64, target: i64) -> Vec<RosterAction> {
        [
            RosterAction::Kick { target },
            RosterAction::TransferLeadership { target },
        ]
        .into_iter()
        .filter(|a| Self::check(team, actor, *a).is_ok())
        .collect()
    }
}

impl Team {
    pub fn member(&self, user_id: i64) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_leader(&self, user_id: i64) -> bool {
        self.leader_id == user_id
    }

    pub fn leader(&self) -> Option<&TeamMember> {
        self.member(self.leader_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Exactly one `Leader` member, and it is the one `leader_id` points at.
    pub fn validate_leadership(&self) -> DomainResult<()> {
        let leaders: Vec<_> = self
            .members
            .iter()
            .filter(|m| m.role == MemberRole::Leader)
            .collect();

        let inconsistent = |message: String| DomainError::InconsistentRoster {
            team_id: self.team_id,
            message,
        };

        match leaders.as_slice() {
            [] => Err(inconsistent("no member has the Leader role".into())),
            [leader] if leader.user_id != self.leader_id => Err(inconsistent(format!(
                "leader role held by {} but leaderId is {}",
                leader.user_id, self.leader_id
            ))),
            [_] => Ok(()),
            many => Err(inconsistent(format!("{} members hold the Leader role", many.len()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: i64, role: MemberRole) -> TeamMember {
        TeamMember {
            user_id,
            full_name: format!("Student {}", user_id),
            email: None,
            student_code: None,
            role,
        }
    }

    fn team() -> Team {
        Team {
            team_id: 1,
            team_code: "T001".into(),
            team_name: "Compilers".into(),
            team_avatar: None,
            leader_id: 10,
            members: vec![
                member(10, MemberRole::Leader),
                member(11, MemberRole::Member),
                member(12, MemberRole::Member),
            ],
            topic_id: None,
            topic_name: None,
            description: None,
            semester_id: None,
        }
    }

    #[test]
    fn test_leader_can_kick_member() {
        assert!(RosterGuard::check(&team(), 10, RosterAction::Kick { target: 11 }).is_ok());
    }

    #[test]
    fn test_member_cannot_kick() {
        assert_eq!(
            RosterGuard::check(&team(), 11, RosterAction::Kick { target: 12 }),
            Err(RosterDenied::NotLeader("kick"))
        );
    }

    #[test]
    fn test_leader_cannot_kick_self() {
        assert!(RosterGuard::check(&team(), 10, RosterAction::Kick { target: 10 }).is_err());
    }

    #[test]
    fn test_transfer_requires_other_member() {
        let t = team();
        assert!(RosterGuard::check(&t, 10, RosterAction::TransferLeadership { target: 12 }).is_ok());
        assert_eq!(
            RosterGuard::check(&t, 10, RosterAction::TransferLeadership { target: 10 }),
            Err(RosterDenied::TargetIsSelf("transfer leadership"))
        );
        assert_eq!(
            RosterGuard::check(&t, 10, RosterAction::TransferLeadership { target: 99 }),
            Err(RosterDenied::TargetNotMember(99))
        );
    }

    #[test]
    fn test_leave_rules() {
        let t = team();
        assert!(RosterGuard::check(&t, 11, RosterAction::Leave).is_ok());
        let denied = RosterGuard::check(&t, 10, RosterAction::Leave).unwrap_err();
        assert_eq!(denied, RosterDenied::LeaderCannotLeave);
        assert_eq!(denied.to_string(), LEADER_LEAVE_MESSAGE);
    }

    #[test]
    fn test_disband_leader_only() {
        let t = team();
        assert!(RosterGuard::check(&t, 10, RosterAction::Disband).is_ok());
        assert!(RosterGuard::check(&t, 12, RosterAction::Disband).is_err());
        assert_eq!(
            RosterGuard::check(&t, 42, RosterAction::Disband),
            Err(RosterDenied::NotMember)
        );
    }

    #[test]
    fn test_available_against() {
        let t = team();
        assert_eq!(RosterGuard::available_against(&t, 10, 11).len(), 2);
        assert!(RosterGuard::available_against(&t, 11, 10).is_empty());
    }

    #[test]
    fn test_validate_leadership() {
        let mut t = team();
        assert!(t.validate_leadership().is_ok());

        t.leader_id = 11;
        assert!(t.validate_leadership().is_err());

        t.members[1].role = MemberRole::Leader;
        assert!(t.validate_leadership().is_err());
    }
}
