//! Checklist commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use capstone_app::{AppError, ChecklistBoard, Prompt};
use capstone_domain::ChecklistDraft;

use crate::context::Context;
use crate::output;

#[derive(Subcommand)]
pub enum ChecklistCommand {
    /// List checklist items in display order
    List,

    /// Add an item
    Add(ItemArgs),

    /// Replace an item
    Update {
        id: i64,

        #[command(flatten)]
        item: ItemArgs,
    },

    /// Delete an item
    Delete { id: i64 },

    /// Mark an item done or not done
    Toggle { id: i64 },
}

#[derive(Args)]
pub struct ItemArgs {
    #[arg(long)]
    title: String,

    #[arg(long, default_value = "")]
    content: String,

    #[arg(long, default_value_t = 0)]
    order: i32,
}

impl From<ItemArgs> for ChecklistDraft {
    fn from(args: ItemArgs) -> Self {
        ChecklistDraft {
            title: args.title,
            content: args.content,
            display_order: args.order,
        }
    }
}

pub async fn execute(command: ChecklistCommand, ctx: &Context) -> Result<()> {
    let mut board = ChecklistBoard::new(ctx.client.clone());

    match command {
        ChecklistCommand::List => {
            let items = board.refresh().await?;
            if ctx.json {
                return output::print_json(items);
            }
            for item in items {
                let mark = if item.is_completed { "☑" } else { "☐" };
                println!("{} {:>4}  {}", mark, item.checklist_id, item.title);
                if !item.content.is_empty() {
                    println!("         {}", item.content);
                }
            }
        }
        ChecklistCommand::Add(args) => {
            let item = board.add(&args.into()).await?;
            output::success(format!("Added \"{}\" (id {})", item.title, item.checklist_id));
        }
        ChecklistCommand::Update { id, item } => {
            let item = board.update(id, &item.into()).await?;
            output::success(format!("Updated \"{}\"", item.title));
        }
        ChecklistCommand::Delete { id } => {
            let prompt =
                Prompt::new("Delete item", format!("Delete checklist item {}?", id)).destructive();
            if !ctx.confirm.confirm(&prompt) {
                return Err(AppError::Cancelled.into());
            }
            board.delete(id).await?;
            output::success("Item deleted");
        }
        ChecklistCommand::Toggle { id } => {
            let item = board.toggle(id).await?;
            let state = if item.is_completed { "done" } else { "not done" };
            output::success(format!("\"{}\" marked {}", item.title, state));
        }
    }

    Ok(())
}
