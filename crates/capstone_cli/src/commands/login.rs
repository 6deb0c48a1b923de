//! Session commands: login, logout, whoami.

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use crate::context::Context;
use crate::output;

#[derive(Args)]
pub struct LoginArgs {
    /// Google ID token obtained from the sign-in page
    #[arg(long, env = "CAPSTONE_ID_TOKEN", hide_env_values = true)]
    id_token: String,

    /// Campus to sign in to (see `capstone campus`)
    #[arg(short, long)]
    campus: Option<i64>,
}

pub async fn execute(args: LoginArgs, ctx: &Context) -> Result<()> {
    let Some(campus_id) = args.campus else {
        let campuses = ctx.client.campuses().list().await?;
        println!("Pick a campus with --campus <ID>:");
        for campus in campuses {
            println!("  {:>4}  {}", campus.campus_id, campus.campus_name);
        }
        bail!("No campus selected");
    };

    info!("Signing in to campus {}", campus_id);
    let session = ctx.client.login(&args.id_token, campus_id).await?;
    output::success(format!("Signed in as {}", session.display_name()));
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    ctx.client.logout()?;
    output::success("Signed out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    let session = ctx.client.require_session()?;
    let roles: Vec<&str> = session
        .claims
        .known_roles()
        .into_iter()
        .map(|r| r.as_str())
        .collect();

    println!("👤 {}", session.display_name());
    if let Some(user) = &session.user {
        println!("   Email:   {}", user.email);
        println!("   Code:    {}", output::or_dash(user.student_code.as_deref()));
    }
    println!(
        "   User id: {}",
        session
            .user_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("   Roles:   {}", roles.join(", "));
    if let Some(expires_at) = session.claims.expires_at {
        println!("   Expires: {}", expires_at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}
