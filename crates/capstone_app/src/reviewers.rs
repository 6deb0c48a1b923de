//! Reviewer flags on lecturer whitelist entries.

use std::sync::Arc;

use tracing::info;

use capstone_api::PortalClient;
use capstone_domain::{Role, Whitelist};

use crate::error::AppResult;

const MANAGER_ROLES: [Role; 2] = [Role::Admin, Role::Moderator];

pub struct ReviewerManager {
    client: Arc<PortalClient>,
}

impl ReviewerManager {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }

    /// Whitelist entries for a role, reviewers first.
    pub async fn list(&self, role_id: i64) -> AppResult<Vec<Whitelist>> {
        self.client.require_role(&MANAGER_ROLES)?;
        let mut entries = self.client.whitelists().by_role(role_id).await?;
        entries.sort_by(|a, b| b.is_reviewer.cmp(&a.is_reviewer).then(a.email.cmp(&b.email)));
        Ok(entries)
    }

    pub async fn set_reviewer(&self, whitelist_id: i64, is_reviewer: bool) -> AppResult<()> {
        self.client.require_role(&MANAGER_ROLES)?;
        self.client
            .whitelists()
            .set_reviewer(whitelist_id, is_reviewer)
            .await?;
        info!(
            "Whitelist entry {} reviewer flag set to {}",
            whitelist_id, is_reviewer
        );
        Ok(())
    }
}
