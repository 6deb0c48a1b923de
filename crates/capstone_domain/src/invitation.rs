//! Invitation lifecycle and the invited-user map.

use std::collections::HashMap;

use crate::error::{DomainError, DomainResult};
use crate::models::InvitationStatus;

impl InvitationStatus {
    /// Only pending invitations move, and every move is terminal.
    pub fn can_transition_to(&self, next: InvitationStatus) -> bool {
        use InvitationStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Pending, Declined) | (Pending, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }

    pub fn transition(&self, next: InvitationStatus) -> DomainResult<InvitationStatus> {
        if !self.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: format!("{:?}", self),
                to: format!("{:?}", next),
            });
        }
        Ok(next)
    }
}

/// Label of the per-student invite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteButton {
    Invite,
    Cancel,
}

/// `userId → invitationId` for invitations the leader has sent from the
/// current search screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitedUsers {
    entries: HashMap<i64, i64>,
}

impl InvitedUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_invited(&mut self, user_id: i64, invitation_id: i64) {
        self.entries.insert(user_id, invitation_id);
    }

    /// Remove a user, returning the invitation id they had.
    pub fn remove(&mut self, user_id: i64) -> Option<i64> {
        self.entries.remove(&user_id)
    }

    pub fn invitation_for(&self, user_id: i64) -> Option<i64> {
        self.entries.get(&user_id).copied()
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.entries.contains_key(&user_id)
    }

    pub fn button_for(&self, user_id: i64) -> InviteButton {
        if self.contains(user_id) {
            InviteButton::Cancel
        } else {
            InviteButton::Invite
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
