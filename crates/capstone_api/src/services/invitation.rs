//! Invitation endpoints.

use std::sync::Arc;

use capstone_domain::{InvitationRequest, TeamInvitation};

use super::{fetch, send};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

#[derive(Clone)]
pub struct InvitationService {
    transport: Arc<dyn Transport>,
}

impl InvitationService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Invitations addressed to the caller.
    pub async fn my_invitations(&self) -> ApiResult<Vec<TeamInvitation>> {
        let request = ApiRequest::get("/invitation/my-invitations");
        fetch(self.transport.as_ref(), request).await
    }

    /// Invitations a team has sent.
    pub async fn team_invitations(&self, team_id: i64) -> ApiResult<Vec<TeamInvitation>> {
        let request = ApiRequest::get(format!("/invitation/team/{}", team_id));
        fetch(self.transport.as_ref(), request).await
    }

    pub async fn send(&self, invitation: &InvitationRequest) -> ApiResult<TeamInvitation> {
        let request = ApiRequest::post("/invitation/send").json(invitation)?;
        fetch(self.transport.as_ref(), request).await
    }

    pub async fn accept(&self, invitation_id: i64) -> ApiResult<()> {
        self.resolve(invitation_id, "accept").await
    }

    pub async fn decline(&self, invitation_id: i64) -> ApiResult<()> {
        self.resolve(invitation_id, "decline").await
    }

    pub async fn cancel(&self, invitation_id: i64) -> ApiResult<()> {
        self.resolve(invitation_id, "cancel").await
    }

    async fn resolve(&self, invitation_id: i64, action: &str) -> ApiResult<()> {
        let path = format!("/invitation/{}/{}", invitation_id, action);
        send(self.transport.as_ref(), ApiRequest::post(path)).await
    }
}
