//! CLI command definitions.
//!
//! Each subcommand maps to one portal area and drives the matching workflow
//! from `capstone_app`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod campus;
pub mod checklist;
pub mod invite;
pub mod login;
pub mod reviewer;
pub mod semester;
pub mod student;
pub mod team;
pub mod thesis;

/// Capstone portal - semesters, teams, invitations and theses
#[derive(Parser)]
#[command(name = "capstone")]
#[command(version, about = "Command-line client for the capstone portal")]
#[command(long_about = r#"
Command-line client for the university capstone/thesis portal.

AREAS:
  login / logout / whoami  → Session management
  semester                 → Semester administration (admins)
  team                     → Your team and its roster
  invite                   → Team invitations, sent and received
  student                  → Student lookup
  thesis                   → Thesis proposal and versioned uploads
  checklist                → Review checklist
  reviewer                 → Reviewer flags on lecturer whitelists

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Not signed in or session expired
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Print machine-readable JSON where supported
    #[arg(long, global = true)]
    pub json: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Config file (defaults to ./capstone.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the portal API base URL
    #[arg(long, global = true, env = "CAPSTONE_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with a Google ID token
    Login(login::LoginArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List campuses
    Campus,

    /// Manage semesters
    #[command(subcommand)]
    Semester(semester::SemesterCommand),

    /// Your team
    #[command(subcommand)]
    Team(team::TeamCommand),

    /// Team invitations
    #[command(subcommand)]
    Invite(invite::InviteCommand),

    /// Look up students
    #[command(subcommand)]
    Student(student::StudentCommand),

    /// Thesis proposal and uploads
    #[command(subcommand)]
    Thesis(thesis::ThesisCommand),

    /// Review checklist
    #[command(subcommand)]
    Checklist(checklist::ChecklistCommand),

    /// Reviewer assignments
    #[command(subcommand)]
    Reviewer(reviewer::ReviewerCommand),
}
