//! Review checklist maintenance.

use std::sync::Arc;

use tracing::info;

use capstone_api::PortalClient;
use capstone_domain::{ChecklistDraft, ChecklistItem, Role};

use crate::error::{AppError, AppResult};

const EDITOR_ROLES: [Role; 2] = [Role::Admin, Role::Moderator];

/// Checklist items kept in display order.
pub struct ChecklistBoard {
    client: Arc<PortalClient>,
    items: Vec<ChecklistItem>,
}

impl ChecklistBoard {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self {
            client,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub async fn refresh(&mut self) -> AppResult<&[ChecklistItem]> {
        self.client.require_session()?;
        self.items = self.client.checklists().list().await?;
        self.sort();
        Ok(&self.items)
    }

    pub async fn add(&mut self, draft: &ChecklistDraft) -> AppResult<ChecklistItem> {
        let draft = validated(draft)?;
        self.client.require_role(&EDITOR_ROLES)?;

        let item = self.client.checklists().create(&draft).await?;
        info!("Added checklist item {}", item.checklist_id);
        self.upsert(item.clone());
        Ok(item)
    }

    pub async fn update(&mut self, checklist_id: i64, draft: &ChecklistDraft) -> AppResult<ChecklistItem> {
        let draft = validated(draft)?;
        self.client.require_role(&EDITOR_ROLES)?;

        let item = self.client.checklists().update(checklist_id, &draft).await?;
        self.upsert(item.clone());
        Ok(item)
    }

    pub async fn delete(&mut self, checklist_id: i64) -> AppResult<()> {
        self.client.require_role(&EDITOR_ROLES)?;
        self.client.checklists().delete(checklist_id).await?;
        self.items.retain(|i| i.checklist_id != checklist_id);
        info!("Deleted checklist item {}", checklist_id);
        Ok(())
    }

    /// Flip completion on an item.
    pub async fn toggle(&mut self, checklist_id: i64) -> AppResult<ChecklistItem> {
        self.client.require_session()?;
        let item = self.client.checklists().toggle(checklist_id).await?;
        self.upsert(item.clone());
        Ok(item)
    }

    fn upsert(&mut self, item: ChecklistItem) {
        match self
            .items
            .iter_mut()
            .find(|i| i.checklist_id == item.checklist_id)
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.sort();
    }

    fn sort(&mut self) {
        self.items
            .sort_by_key(|i| (i.display_order, i.checklist_id));
    }
}

fn validated(draft: &ChecklistDraft) -> AppResult<ChecklistDraft> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation(vec!["Title is required.".to_string()]));
    }
    if draft.display_order < 0 {
        return Err(AppError::Validation(vec![
            "Display order cannot be negative.".to_string(),
        ]));
    }
    Ok(ChecklistDraft {
        title: title.to_string(),
        content: draft.content.trim().to_string(),
        display_order: draft.display_order,
    })
}
