//! Team commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use capstone_app::TeamWorkspace;
use capstone_domain::{MemberRole, Team, TeamDraft};

use crate::context::Context;
use crate::output;

#[derive(Subcommand)]
pub enum TeamCommand {
    /// Show your team
    Show,

    /// List teams, optionally for one semester
    List {
        #[arg(long)]
        semester: Option<i64>,
    },

    /// Create a team (you become its leader)
    Create(TeamArgs),

    /// Edit your team (leader only)
    Update(TeamArgs),

    /// Remove a member (leader only)
    Kick { user_id: i64 },

    /// Hand leadership to another member
    Transfer { user_id: i64 },

    /// Leave your team (members only)
    Leave,

    /// Disband your team (leader only)
    Disband,
}

#[derive(Args)]
pub struct TeamArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    description: Option<String>,

    /// Avatar image URL
    #[arg(long)]
    avatar: Option<String>,
}

impl From<TeamArgs> for TeamDraft {
    fn from(args: TeamArgs) -> Self {
        TeamDraft {
            team_name: args.name,
            description: args.description,
            team_avatar: args.avatar,
        }
    }
}

pub async fn execute(command: TeamCommand, ctx: &Context) -> Result<()> {
    let workspace = TeamWorkspace::new(ctx.client.clone(), ctx.confirm.clone());

    match command {
        TeamCommand::Show => match workspace.load().await? {
            Some(team) if ctx.json => output::print_json(&team)?,
            Some(team) => {
                print_team(&team);
                print_actions(&workspace, &team)?;
            }
            None => println!("You are not in a team yet. Create one with `capstone team create`."),
        },
        TeamCommand::List { semester } => {
            let teams = workspace.list(semester).await?;
            if ctx.json {
                return output::print_json(&teams);
            }
            for team in teams {
                println!(
                    "{:>4}  {:<8} {:<28} {} members",
                    team.team_id,
                    team.team_code,
                    team.team_name,
                    team.member_count()
                );
            }
        }
        TeamCommand::Create(args) => {
            let team = workspace.create(&args.into()).await?;
            output::success(format!("Created team {} ({})", team.team_name, team.team_code));
        }
        TeamCommand::Update(args) => {
            let team = my_team(&workspace).await?;
            let updated = workspace.update(&team, &args.into()).await?;
            output::success(format!("Updated team {}", updated.team_name));
        }
        TeamCommand::Kick { user_id } => {
            let team = my_team(&workspace).await?;
            let updated = workspace.kick(&team, user_id).await?;
            output::success("Member removed");
            print_team(&updated);
        }
        TeamCommand::Transfer { user_id } => {
            let team = my_team(&workspace).await?;
            let updated = workspace.transfer_leadership(&team, user_id).await?;
            output::success("Leadership transferred");
            print_team(&updated);
        }
        TeamCommand::Leave => {
            let team = my_team(&workspace).await?;
            workspace.leave(&team).await?;
            output::success(format!("You left {}", team.team_name));
        }
        TeamCommand::Disband => {
            let team = my_team(&workspace).await?;
            workspace.disband(&team).await?;
            output::success(format!("Team {} disbanded", team.team_name));
        }
    }

    Ok(())
}

async fn my_team(workspace: &TeamWorkspace) -> Result<Team> {
    workspace
        .load()
        .await?
        .ok_or_else(|| anyhow!("You are not in a team"))
}

fn print_team(team: &Team) {
    println!("👥 {} ({})", team.team_name, team.team_code);
    if let Some(description) = &team.description {
        println!("   {}", description);
    }
    if let Some(topic) = &team.topic_name {
        println!("   Topic: {}", topic);
    }
    if let Some(leader) = team.leader() {
        println!("   Leader: {}", leader.full_name);
    }
    for member in &team.members {
        let marker = if member.role == MemberRole::Leader || team.is_leader(member.user_id) {
            "★"
        } else {
            " "
        };
        println!(
            "   {} {:>5}  {:<24} {}",
            marker,
            member.user_id,
            member.full_name,
            output::or_dash(member.student_code.as_deref())
        );
    }
}

fn print_actions(workspace: &TeamWorkspace, team: &Team) -> Result<()> {
    for member in &team.members {
        let actions = workspace.actions_against(team, member.user_id)?;
        if actions.is_empty() {
            continue;
        }
        let names: Vec<&str> = actions.iter().map(|a| a.name()).collect();
        println!("   Actions on {}: {}", member.full_name, names.join(", "));
    }
    Ok(())
}
