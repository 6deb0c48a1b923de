//! Capstone portal CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Not signed in or session expired

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod context;
mod output;

use capstone_api::ApiError;
use capstone_app::AppError;
use commands::{Cli, Commands};
use context::Context;

/// Scriptable exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const UNAUTHENTICATED: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "capstone=debug" } else { "capstone=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},warn", default_level)));
    let registry = tracing_subscriber::registry().with(filter);
    // Ignore a second initialisation.
    let _ = if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    let result = match Context::load(&cli) {
        Ok(ctx) => run(cli.command, &ctx).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ {}", user_facing(&e));
            ExitCode::from(exit_code)
        }
    }
}

async fn run(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Login(args) => commands::login::execute(args, ctx).await,
        Commands::Logout => commands::login::logout(ctx),
        Commands::Whoami => commands::login::whoami(ctx),
        Commands::Campus => commands::campus::execute(ctx).await,
        Commands::Semester(args) => commands::semester::execute(args, ctx).await,
        Commands::Team(args) => commands::team::execute(args, ctx).await,
        Commands::Invite(args) => commands::invite::execute(args, ctx).await,
        Commands::Student(args) => commands::student::execute(args, ctx).await,
        Commands::Thesis(args) => commands::thesis::execute(args, ctx).await,
        Commands::Checklist(args) => commands::checklist::execute(args, ctx).await,
        Commands::Reviewer(args) => commands::reviewer::execute(args, ctx).await,
    }
}

/// Portal errors print their user message; anything else prints the chain.
fn user_facing(e: &anyhow::Error) -> String {
    if let Some(app) = e.downcast_ref::<AppError>() {
        return app.user_message();
    }
    if let Some(api) = e.downcast_ref::<ApiError>() {
        return api.user_message();
    }
    format!("{:#}", e)
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let api = e
        .downcast_ref::<ApiError>()
        .or_else(|| match e.downcast_ref::<AppError>() {
            Some(AppError::Api(api)) => Some(api),
            _ => None,
        });
    if api.is_some_and(ApiError::is_auth) {
        return ExitCodes::UNAUTHENTICATED;
    }

    match e.downcast_ref::<AppError>() {
        Some(AppError::Validation(_)) => ExitCodes::VALIDATION_FAILURE,
        Some(AppError::Denied(_)) | Some(AppError::NotAllowed(_)) => ExitCodes::VALIDATION_FAILURE,
        _ if matches!(api, Some(ApiError::Config(_))) => ExitCodes::INVALID_ARGS,
        _ => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstone_domain::RosterDenied;

    #[test]
    fn test_exit_codes() {
        let e = anyhow::Error::new(AppError::Validation(vec!["Title is required.".into()]));
        assert_eq!(categorize_error(&e), ExitCodes::VALIDATION_FAILURE);

        let e = anyhow::Error::new(AppError::Denied(RosterDenied::LeaderCannotLeave));
        assert_eq!(categorize_error(&e), ExitCodes::VALIDATION_FAILURE);

        let e = anyhow::Error::new(ApiError::NotAuthenticated);
        assert_eq!(categorize_error(&e), ExitCodes::UNAUTHENTICATED);

        let e = anyhow::Error::new(AppError::Api(ApiError::SessionExpired));
        assert_eq!(categorize_error(&e), ExitCodes::UNAUTHENTICATED);

        let e = anyhow::anyhow!("boom");
        assert_eq!(categorize_error(&e), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn test_user_facing_prefers_backend_message() {
        let e = anyhow::Error::new(AppError::Api(ApiError::Http {
            status: 400,
            message: "Team is full".into(),
        }));
        assert_eq!(user_facing(&e), "Team is full");
    }
}
