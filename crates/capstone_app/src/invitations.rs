//! Invitations, from both sides.
//!
//! An invitee sees their pending invitations and accepts or declines them.
//! A team leader invites students from the search results and may cancel
//! while the invitation is still pending; [`InvitedUsers`] drives the
//! Invite/Cancel toggle and is put back the way it was if a request fails.

use std::sync::Arc;

use tracing::{debug, info, warn};

use capstone_api::PortalClient;
use capstone_domain::{
    InvitationRequest, InvitationStatus, InviteButton, InvitedUsers, RosterAction, RosterGuard,
    Team, TeamInvitation, UserSummary,
};

use crate::error::{AppError, AppResult};

pub struct InvitationBoard {
    client: Arc<PortalClient>,
    received: Vec<TeamInvitation>,
    invited: InvitedUsers,
}

impl InvitationBoard {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self {
            client,
            received: Vec::new(),
            invited: InvitedUsers::new(),
        }
    }

    /// Pending invitations addressed to the signed-in user.
    pub fn received(&self) -> &[TeamInvitation] {
        &self.received
    }

    pub fn invited(&self) -> &InvitedUsers {
        &self.invited
    }

    pub fn button_for(&self, user_id: i64) -> InviteButton {
        self.invited.button_for(user_id)
    }

    pub async fn refresh(&mut self) -> AppResult<&[TeamInvitation]> {
        self.client.require_session()?;
        let mut invitations = self.client.invitations().my_invitations().await?;
        invitations.retain(|i| i.status == InvitationStatus::Pending);
        self.received = invitations;
        Ok(&self.received)
    }

    /// Accept an invitation. The user joins the team, so the list is fetched
    /// again rather than patched.
    pub async fn accept(&mut self, invitation_id: i64) -> AppResult<()> {
        self.check_transition(invitation_id, InvitationStatus::Accepted).await?;
        self.client.invitations().accept(invitation_id).await?;
        info!("Accepted invitation {}", invitation_id);
        self.refresh().await?;
        Ok(())
    }

    pub async fn decline(&mut self, invitation_id: i64) -> AppResult<()> {
        self.check_transition(invitation_id, InvitationStatus::Declined).await?;
        self.client.invitations().decline(invitation_id).await?;
        self.received.retain(|i| i.invitation_id != invitation_id);
        info!("Declined invitation {}", invitation_id);
        Ok(())
    }

    /// Seed the invited map from the team's pending invitations.
    pub async fn load_sent(&mut self, team: &Team) -> AppResult<()> {
        self.client.require_session()?;
        let sent = self.client.invitations().team_invitations(team.team_id).await?;

        self.invited = InvitedUsers::new();
        for invitation in sent
            .iter()
            .filter(|i| i.status == InvitationStatus::Pending)
        {
            if let Some(invitee) = invitation.invitee_id {
                self.invited.mark_invited(invitee, invitation.invitation_id);
            }
        }
        debug!("Team {} has {} pending invitations", team.team_id, self.invited.len());
        Ok(())
    }

    /// Invite `student` to `team`. Inviting someone already invited is a no-op.
    pub async fn invite(&mut self, team: &Team, student: &UserSummary) -> AppResult<i64> {
        if let Some(existing) = self.invited.invitation_for(student.user_id) {
            return Ok(existing);
        }
        if student.has_team {
            return Err(AppError::NotAllowed(format!(
                "{} already belongs to a team.",
                student.full_name
            )));
        }
        let actor = crate::current_user_id(&self.client)?;
        RosterGuard::check(team, actor, RosterAction::Invite)?;

        let request = InvitationRequest {
            team_id: team.team_id,
            student_code: student.student_code.clone(),
            email: student
                .student_code
                .is_none()
                .then(|| student.email.clone()),
        };
        let sent = self.client.invitations().send(&request).await?;

        self.invited.mark_invited(student.user_id, sent.invitation_id);
        info!("Invited {} to team {}", student.full_name, team.team_id);
        Ok(sent.invitation_id)
    }

    /// Cancel the pending invitation for `user_id`.
    ///
    /// The entry is dropped before the request goes out and restored if it
    /// fails.
    pub async fn cancel(&mut self, user_id: i64) -> AppResult<()> {
        let Some(invitation_id) = self.invited.remove(user_id) else {
            return Err(AppError::NotAllowed(format!(
                "There is no pending invitation for user {}.",
                user_id
            )));
        };

        if let Err(e) = self.client.invitations().cancel(invitation_id).await {
            warn!("Cancelling invitation {} failed, restoring it: {}", invitation_id, e);
            self.invited.mark_invited(user_id, invitation_id);
            return Err(e.into());
        }

        info!("Cancelled invitation {}", invitation_id);
        Ok(())
    }

    /// Invite or cancel, whichever the button currently shows.
    pub async fn toggle(&mut self, team: &Team, student: &UserSummary) -> AppResult<InviteButton> {
        match self.button_for(student.user_id) {
            InviteButton::Invite => {
                self.invite(team, student).await?;
            }
            InviteButton::Cancel => self.cancel(student.user_id).await?,
        }
        Ok(self.button_for(student.user_id))
    }

    /// An id missing from the received list triggers one refresh before it is
    /// refused.
    async fn check_transition(&mut self, invitation_id: i64, next: InvitationStatus) -> AppResult<()> {
        self.client.require_session()?;
        if !self.received.iter().any(|i| i.invitation_id == invitation_id) {
            self.refresh().await?;
        }
        let invitation = self
            .received
            .iter()
            .find(|i| i.invitation_id == invitation_id)
            .ok_or_else(|| {
                AppError::NotAllowed(format!("Invitation {} is not pending.", invitation_id))
            })?;
        invitation.status.transition(next)?;
        Ok(())
    }
}
