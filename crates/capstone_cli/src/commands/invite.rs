//! Invitation commands.

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};

use capstone_app::{InvitationBoard, TeamWorkspace};
use capstone_domain::{Team, UserSummary};

use crate::context::Context;
use crate::output;

#[derive(Subcommand)]
pub enum InviteCommand {
    /// Invitations you have received
    List,

    /// Pending invitations your team has sent
    Sent,

    /// Invite a student to your team
    Send(SendArgs),

    /// Cancel a pending invitation
    Cancel {
        /// User id of the invited student
        user_id: i64,
    },

    /// Accept an invitation
    Accept { invitation_id: i64 },

    /// Decline an invitation
    Decline { invitation_id: i64 },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SendArgs {
    /// Student code, e.g. SE160123
    #[arg(long)]
    student_code: Option<String>,

    #[arg(long)]
    email: Option<String>,
}

pub async fn execute(command: InviteCommand, ctx: &Context) -> Result<()> {
    let mut board = InvitationBoard::new(ctx.client.clone());

    match command {
        InviteCommand::List => {
            let invitations = board.refresh().await?;
            if ctx.json {
                return output::print_json(invitations);
            }
            if invitations.is_empty() {
                println!("No pending invitations.");
            }
            for invitation in invitations {
                println!(
                    "{:>4}  {:<24} from {}",
                    invitation.invitation_id,
                    output::or_dash(invitation.team_name.as_deref()),
                    output::or_dash(invitation.invited_by_name.as_deref())
                );
            }
        }
        InviteCommand::Sent => {
            let team = my_team(ctx).await?;
            board.load_sent(&team).await?;
            println!("{} pending invitation(s) from {}", board.invited().len(), team.team_name);
        }
        InviteCommand::Send(args) => {
            let team = my_team(ctx).await?;
            board.load_sent(&team).await?;

            let keyword = args
                .student_code
                .as_deref()
                .or(args.email.as_deref())
                .unwrap_or_default();
            let student = find_student(ctx, keyword).await?;

            let invitation_id = board.invite(&team, &student).await?;
            output::success(format!(
                "Invited {} (invitation {})",
                student.full_name, invitation_id
            ));
        }
        InviteCommand::Cancel { user_id } => {
            let team = my_team(ctx).await?;
            board.load_sent(&team).await?;
            board.cancel(user_id).await?;
            output::success("Invitation cancelled");
        }
        InviteCommand::Accept { invitation_id } => {
            board.refresh().await?;
            board.accept(invitation_id).await?;
            output::success("Invitation accepted. Welcome to the team!");
        }
        InviteCommand::Decline { invitation_id } => {
            board.refresh().await?;
            board.decline(invitation_id).await?;
            output::success("Invitation declined");
        }
    }

    Ok(())
}

async fn my_team(ctx: &Context) -> Result<Team> {
    TeamWorkspace::new(ctx.client.clone(), ctx.confirm.clone())
        .load()
        .await?
        .ok_or_else(|| anyhow!("You are not in a team"))
}

/// Exact match on student code or email among the search results.
async fn find_student(ctx: &Context, keyword: &str) -> Result<UserSummary> {
    let wanted = keyword.trim().to_ascii_lowercase();
    let results = ctx.client.users().search(keyword.trim()).await?;

    let mut matches: Vec<UserSummary> = results
        .into_iter()
        .filter(|u| {
            u.email.to_ascii_lowercase() == wanted
                || u.student_code
                    .as_deref()
                    .is_some_and(|c| c.to_ascii_lowercase() == wanted)
        })
        .collect();

    if matches.len() > 1 {
        bail!("{} students match {}; use the exact student code", matches.len(), keyword);
    }
    matches
        .pop()
        .ok_or_else(|| anyhow!("No student found for {}", keyword))
}
