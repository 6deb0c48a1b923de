//! The signed-in student's team.

use std::sync::Arc;

use tracing::{info, warn};

use capstone_api::PortalClient;
use capstone_domain::{Role, RosterAction, RosterGuard, Team, TeamDraft};

use crate::confirm::{Confirm, Prompt};
use crate::error::{AppError, AppResult};
use crate::submit::InFlight;

pub struct TeamWorkspace {
    client: Arc<PortalClient>,
    confirm: Arc<dyn Confirm>,
    submitting: InFlight,
}

impl TeamWorkspace {
    pub fn new(client: Arc<PortalClient>, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            client,
            confirm,
            submitting: InFlight::new(),
        }
    }

    /// The user's team, or `None` when they have not joined one.
    pub async fn load(&self) -> AppResult<Option<Team>> {
        self.client.require_session()?;
        let team = self.client.teams().my_team().await?;
        if let Some(team) = &team {
            check_leadership(team);
        }
        Ok(team)
    }

    /// Roster actions the signed-in user may take against `target`.
    pub fn actions_against(&self, team: &Team, target: i64) -> AppResult<Vec<RosterAction>> {
        let actor = crate::current_user_id(&self.client)?;
        Ok(RosterGuard::available_against(team, actor, target))
    }

    pub async fn list(&self, semester_id: Option<i64>) -> AppResult<Vec<Team>> {
        self.client.require_session()?;
        Ok(self.client.teams().list(semester_id).await?)
    }

    pub async fn create(&self, draft: &TeamDraft) -> AppResult<Team> {
        let draft = validated(draft)?;
        self.client.require_role(&[Role::Student])?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        if let Some(existing) = self.client.teams().my_team().await? {
            return Err(AppError::NotAllowed(format!(
                "You already belong to team {}.",
                existing.team_name
            )));
        }

        let team = self.client.teams().create(&draft).await?;
        info!("Created team {} ({})", team.team_name, team.team_code);
        Ok(team)
    }

    pub async fn update(&self, team: &Team, draft: &TeamDraft) -> AppResult<Team> {
        let draft = validated(draft)?;
        self.guard(team, RosterAction::Edit)?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        Ok(self.client.teams().update(team.team_id, &draft).await?)
    }

    /// Remove `target` from the team and return the refreshed roster.
    pub async fn kick(&self, team: &Team, target: i64) -> AppResult<Team> {
        let action = RosterAction::Kick { target };
        self.guard(team, action)?;
        let name = member_name(team, target);
        self.confirm_action(
            action,
            Prompt::new(
                "Remove member",
                format!("Remove {} from {}?", name, team.team_name),
            ),
        )?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        self.client.teams().kick(team.team_id, target).await?;
        info!("Removed {} from team {}", name, team.team_id);
        self.refetch(team.team_id).await
    }

    /// Hand leadership to `target` and return the refreshed roster.
    pub async fn transfer_leadership(&self, team: &Team, target: i64) -> AppResult<Team> {
        let action = RosterAction::TransferLeadership { target };
        self.guard(team, action)?;
        let name = member_name(team, target);
        self.confirm_action(
            action,
            Prompt::new(
                "Transfer leadership",
                format!(
                    "Make {} the leader of {}? You will become a regular member.",
                    name, team.team_name
                ),
            ),
        )?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        self.client
            .teams()
            .transfer_leadership(team.team_id, target)
            .await?;
        info!("Transferred leadership of team {} to {}", team.team_id, name);
        self.refetch(team.team_id).await
    }

    /// Leave the team. A leader is stopped here and nothing is sent.
    pub async fn leave(&self, team: &Team) -> AppResult<()> {
        self.guard(team, RosterAction::Leave)?;
        self.confirm_action(
            RosterAction::Leave,
            Prompt::new("Leave team", format!("Leave {}?", team.team_name)),
        )?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        self.client.teams().leave(team.team_id).await?;
        info!("Left team {}", team.team_id);
        Ok(())
    }

    pub async fn disband(&self, team: &Team) -> AppResult<()> {
        self.guard(team, RosterAction::Disband)?;
        self.confirm_action(
            RosterAction::Disband,
            Prompt::new(
                "Disband team",
                format!(
                    "Disband {}? All {} members will be removed.",
                    team.team_name,
                    team.member_count()
                ),
            )
            .destructive(),
        )?;

        let _guard = self.submitting.try_begin().ok_or(AppError::Busy)?;
        self.client.teams().disband(team.team_id).await?;
        info!("Disbanded team {}", team.team_id);
        Ok(())
    }

    fn guard(&self, team: &Team, action: RosterAction) -> AppResult<()> {
        let actor = crate::current_user_id(&self.client)?;
        RosterGuard::check(team, actor, action).map_err(|denied| {
            warn!("Refused to {} on team {}: {}", action.name(), team.team_id, denied);
            AppError::Denied(denied)
        })
    }

    fn confirm_action(&self, action: RosterAction, prompt: Prompt) -> AppResult<()> {
        if !action.needs_confirmation() || self.confirm.confirm(&prompt) {
            Ok(())
        } else {
            Err(AppError::Cancelled)
        }
    }

    async fn refetch(&self, team_id: i64) -> AppResult<Team> {
        let team = self.client.teams().get(team_id).await?;
        check_leadership(&team);
        Ok(team)
    }
}

/// The backend owns the roster. A broken leadership invariant is logged, and
/// the team is still shown.
fn check_leadership(team: &Team) {
    if let Err(e) = team.validate_leadership() {
        warn!("{}", e);
    }
}

fn member_name(team: &Team, user_id: i64) -> String {
    team.member(user_id)
        .map(|m| m.full_name.clone())
        .unwrap_or_else(|| format!("user {}", user_id))
}

fn validated(draft: &TeamDraft) -> AppResult<TeamDraft> {
    let name = draft.team_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(vec!["Team name is required.".to_string()]));
    }
    Ok(TeamDraft {
        team_name: name.to_string(),
        description: draft
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        team_avatar: draft.team_avatar.clone(),
    })
}
