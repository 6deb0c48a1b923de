//! Team and roster endpoints.

use std::sync::Arc;

use tracing::info;

use capstone_domain::{Team, TeamDraft};

use super::{fetch, fetch_optional, send};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

#[derive(Clone)]
pub struct TeamService {
    transport: Arc<dyn Transport>,
}

impl TeamService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, semester_id: Option<i64>) -> ApiResult<Vec<Team>> {
        let mut request = ApiRequest::get("/team");
        if let Some(id) = semester_id {
            request = request.query("semesterId", id);
        }
        fetch(self.transport.as_ref(), request).await
    }

    /// The caller's team. `None` when they have not joined one.
    pub async fn my_team(&self) -> ApiResult<Option<Team>> {
        fetch_optional(self.transport.as_ref(), ApiRequest::get("/team/my-team")).await
    }

    pub async fn get(&self, team_id: i64) -> ApiResult<Team> {
        fetch(self.transport.as_ref(), ApiRequest::get(format!("/team/{}", team_id))).await
    }

    pub async fn create(&self, draft: &TeamDraft) -> ApiResult<Team> {
        let request = ApiRequest::post("/team").json(draft)?;
        let team: Team = fetch(self.transport.as_ref(), request).await?;
        info!("Created team {} ({})", team.team_name, team.team_id);
        Ok(team)
    }

    pub async fn update(&self, team_id: i64, draft: &TeamDraft) -> ApiResult<Team> {
        let request = ApiRequest::put(format!("/team/{}", team_id)).json(draft)?;
        fetch(self.transport.as_ref(), request).await
    }

    pub async fn kick(&self, team_id: i64, user_id: i64) -> ApiResult<()> {
        let path = format!("/team/{}/members/{}", team_id, user_id);
        send(self.transport.as_ref(), ApiRequest::delete(path)).await
    }

    pub async fn transfer_leadership(&self, team_id: i64, user_id: i64) -> ApiResult<()> {
        let path = format!("/team/{}/transfer-leader/{}", team_id, user_id);
        send(self.transport.as_ref(), ApiRequest::post(path)).await
    }

    pub async fn leave(&self, team_id: i64) -> ApiResult<()> {
        let path = format!("/team/{}/leave", team_id);
        send(self.transport.as_ref(), ApiRequest::post(path)).await
    }

    pub async fn disband(&self, team_id: i64) -> ApiResult<()> {
        let path = format!("/team/{}/disband", team_id);
        send(self.transport.as_ref(), ApiRequest::delete(path)).await?;
        info!("Disbanded team {}", team_id);
        Ok(())
    }
}
