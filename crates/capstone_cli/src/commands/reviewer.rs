//! Reviewer commands.

use anyhow::Result;
use clap::Subcommand;

use capstone_app::ReviewerManager;

use crate::context::Context;
use crate::output;

#[derive(Subcommand)]
pub enum ReviewerCommand {
    /// Whitelist entries for a role
    List {
        /// Role id as configured on the backend
        #[arg(long)]
        role: i64,
    },

    /// Grant or revoke the reviewer flag
    Set {
        whitelist_id: i64,

        /// Revoke instead of grant
        #[arg(long)]
        off: bool,
    },
}

pub async fn execute(command: ReviewerCommand, ctx: &Context) -> Result<()> {
    let manager = ReviewerManager::new(ctx.client.clone());

    match command {
        ReviewerCommand::List { role } => {
            let entries = manager.list(role).await?;
            if ctx.json {
                return output::print_json(&entries);
            }
            for entry in entries {
                println!(
                    "{} {:>4}  {:<30} {}",
                    if entry.is_reviewer { "★" } else { " " },
                    entry.whitelist_id,
                    entry.email,
                    output::or_dash(entry.full_name.as_deref())
                );
            }
        }
        ReviewerCommand::Set { whitelist_id, off } => {
            manager.set_reviewer(whitelist_id, !off).await?;
            let verb = if off { "revoked" } else { "granted" };
            output::success(format!("Reviewer flag {} for entry {}", verb, whitelist_id));
        }
    }
    Ok(())
}
