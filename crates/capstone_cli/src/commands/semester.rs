//! Semester commands.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use capstone_app::{SemesterManager, SemesterRow};
use capstone_domain::{dates, SemesterDraft};

use crate::context::Context;
use crate::output;

#[derive(Subcommand)]
pub enum SemesterCommand {
    /// List semesters with their status
    List,

    /// Show one semester
    Show { id: i64 },

    /// Create a semester
    Create(CreateArgs),

    /// Edit a semester that has not ended
    Update(UpdateArgs),

    /// Start an upcoming semester (ends the active one)
    Start { id: i64 },

    /// End the active semester
    End { id: i64 },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Semester code, e.g. FA24
    #[arg(long)]
    code: String,

    /// Display name; must mention the season, e.g. "Fall 2024"
    #[arg(long)]
    name: String,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Mark as active on creation
    #[arg(long)]
    active: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    id: i64,

    #[arg(long)]
    code: Option<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    start: Option<NaiveDate>,

    #[arg(long)]
    end: Option<NaiveDate>,
}

pub async fn execute(command: SemesterCommand, ctx: &Context) -> Result<()> {
    let manager = SemesterManager::new(ctx.client.clone(), ctx.confirm.clone());

    match command {
        SemesterCommand::List => {
            let overview = manager.overview().await?;
            if ctx.json {
                let semesters: Vec<_> = overview.rows.iter().map(|r| &r.semester).collect();
                return output::print_json(&semesters);
            }

            println!(
                "{:>4}  {:<6} {:<24} {:<10} {:<10} {}",
                "ID", "CODE", "NAME", "START", "END", "STATUS"
            );
            for row in &overview.rows {
                print_row(row);
            }
            for warning in &overview.warnings {
                output::warning(warning.as_str());
            }
        }
        SemesterCommand::Show { id } => {
            let row = manager.get(id).await?;
            if ctx.json {
                return output::print_json(&row.semester);
            }

            let s = &row.semester;
            println!("📅 {} - {}", s.semester_code, s.semester_name);
            println!("   Status:     {}", row.status);
            println!("   Dates:      {} → {}", dates::format_date(&s.start_date), end_label(s.end_date));
            println!("   Teams:      {}", s.team_count.max(s.teams.len() as u32));
            println!("   Whitelist:  {}", s.whitelist_count.max(s.whitelists.len() as u32));
            for team in &s.teams {
                println!("     • {} {} ({} members)", team.team_code, team.team_name, team.member_count);
            }
        }
        SemesterCommand::Create(args) => {
            let draft = SemesterDraft {
                semester_code: args.code,
                semester_name: args.name,
                start_date: args.start,
                end_date: args.end,
                is_active: args.active,
            };
            let created = manager.create(&draft).await?;
            output::success(format!(
                "Created semester {} (id {})",
                created.semester_code, created.semester_id
            ));
        }
        SemesterCommand::Update(args) => {
            let current = manager.get(args.id).await?.semester;
            let mut draft = SemesterDraft::from_semester(&current);
            if let Some(code) = args.code {
                draft.semester_code = code;
            }
            if let Some(name) = args.name {
                draft.semester_name = name;
            }
            if let Some(start) = args.start {
                draft.start_date = start;
            }
            if let Some(end) = args.end {
                draft.end_date = end;
            }

            let updated = manager.update(&current, &draft).await?;
            output::success(format!("Updated semester {}", updated.semester_code));
        }
        SemesterCommand::Start { id } => {
            let overview = manager.overview().await?;
            let target = overview
                .rows
                .iter()
                .map(|r| &r.semester)
                .find(|s| s.semester_id == id)
                .ok_or_else(|| anyhow!("Semester {} not found", id))?;

            manager.start(target, overview.active()).await?;
            output::success(format!("Semester {} started", target.semester_code));
        }
        SemesterCommand::End { id } => {
            let target = manager.get(id).await?.semester;
            manager.end(&target).await?;
            output::success(format!("Semester {} ended", target.semester_code));
        }
    }

    Ok(())
}

fn print_row(row: &SemesterRow) {
    let s = &row.semester;
    println!(
        "{:>4}  {:<6} {:<24} {:<10} {:<10} {}",
        s.semester_id,
        s.semester_code,
        s.semester_name,
        dates::format_date(&s.start_date),
        end_label(s.end_date),
        row.status
    );
}

fn end_label(end: Option<NaiveDate>) -> String {
    end.map(|d| dates::format_date(&d))
        .unwrap_or_else(|| "-".to_string())
}
