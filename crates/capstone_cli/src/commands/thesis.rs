//! Thesis commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context as _, Result};
use clap::{Args, Subcommand};

use capstone_app::ThesisWorkspace;
use capstone_domain::{Thesis, ThesisProposal, ThesisUpdate, Upload};

use crate::context::Context;
use crate::output;

#[derive(Subcommand)]
pub enum ThesisCommand {
    /// Show your thesis
    Mine,

    /// List theses
    List {
        #[arg(long)]
        semester: Option<i64>,
    },

    /// Show one thesis with its version history
    Show { id: i64 },

    /// Propose a thesis with its first document
    Propose(ProposeArgs),

    /// Upload a new version of your thesis
    Upload(UploadArgs),

    /// Edit title or description
    Update(UpdateArgs),
}

#[derive(Args)]
pub struct ProposeArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    description: String,

    /// PDF or Word document
    #[arg(long, value_name = "PATH")]
    file: PathBuf,

    #[arg(long)]
    team: Option<i64>,
}

#[derive(Args)]
pub struct UploadArgs {
    /// PDF or Word document
    file: PathBuf,

    /// What changed in this version
    #[arg(long)]
    note: Option<String>,

    /// Thesis id (defaults to your own thesis)
    #[arg(long)]
    id: Option<i64>,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Thesis id (defaults to your own thesis)
    #[arg(long)]
    id: Option<i64>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,
}

pub async fn execute(command: ThesisCommand, ctx: &Context) -> Result<()> {
    let workspace = ThesisWorkspace::new(ctx.client.clone());

    match command {
        ThesisCommand::Mine => match workspace.mine().await? {
            Some(thesis) if ctx.json => output::print_json(&thesis)?,
            Some(thesis) => print_thesis(&thesis),
            None => println!("You have not proposed a thesis yet."),
        },
        ThesisCommand::List { semester } => {
            let theses = workspace.list(semester).await?;
            if ctx.json {
                return output::print_json(&theses);
            }
            for thesis in theses {
                println!(
                    "{:>4}  {:<12} v{:<3} {}",
                    thesis.thesis_id,
                    thesis.status.label(),
                    thesis.current_version_number().unwrap_or_default(),
                    thesis.title
                );
            }
        }
        ThesisCommand::Show { id } => {
            let thesis = workspace.get(id).await?;
            if ctx.json {
                return output::print_json(&thesis);
            }
            print_thesis(&thesis);
        }
        ThesisCommand::Propose(args) => {
            let proposal = ThesisProposal {
                title: args.title,
                short_description: args.description,
                team_id: args.team,
            };
            let thesis = workspace.propose(&proposal, read_upload(&args.file)?).await?;
            output::success(format!("Proposed \"{}\" (id {})", thesis.title, thesis.thesis_id));
        }
        ThesisCommand::Upload(args) => {
            let thesis = resolve(&workspace, args.id).await?;
            let upload = read_upload(&args.file)?;
            let updated = workspace
                .upload_version(&thesis, upload, args.note.as_deref())
                .await?;
            output::success(format!(
                "Uploaded version {} of \"{}\"",
                updated.current_version_number().unwrap_or_default(),
                updated.title
            ));
        }
        ThesisCommand::Update(args) => {
            if args.title.is_none() && args.description.is_none() {
                bail!("Nothing to update: pass --title and/or --description");
            }
            let thesis = resolve(&workspace, args.id).await?;
            let update = ThesisUpdate {
                title: args.title,
                short_description: args.description,
            };
            let updated = workspace.update(&thesis, &update).await?;
            output::success(format!("Updated \"{}\"", updated.title));
        }
    }

    Ok(())
}

async fn resolve(workspace: &ThesisWorkspace, id: Option<i64>) -> Result<Thesis> {
    match id {
        Some(id) => Ok(workspace.get(id).await?),
        None => workspace
            .mine()
            .await?
            .ok_or_else(|| anyhow!("You have not proposed a thesis yet")),
    }
}

fn read_upload(path: &Path) -> Result<Upload> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", path.display()))?;
    Ok(Upload::new(file_name, bytes))
}

fn print_thesis(thesis: &Thesis) {
    println!("📄 {} (id {})", thesis.title, thesis.thesis_id);
    println!("   Status:  {}", thesis.status);
    if let Some(description) = &thesis.short_description {
        println!("   About:   {}", description);
    }
    if let Some(owner) = &thesis.owner_name {
        println!("   Owner:   {}", owner);
    }
    println!("   File:    {}", output::or_dash(thesis.current_file_url()));

    let histories = thesis.histories_newest_first();
    if !histories.is_empty() {
        println!("   Versions:");
        for (i, history) in histories.iter().enumerate() {
            let current = if i == 0 { " (current)" } else { "" };
            println!(
                "     v{}{}  {}",
                history.version_number,
                current,
                output::or_dash(history.note.as_deref())
            );
        }
    }
}
