//! Shared state for one CLI invocation.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use capstone_api::{ApiConfig, PortalClient};
use capstone_app::{AutoConfirm, Confirm, Prompt};

use crate::commands::Cli;

pub struct Context {
    pub client: Arc<PortalClient>,
    pub confirm: Arc<dyn Confirm>,
    pub json: bool,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = ApiConfig::load(cli.config.as_deref())?;
        if let Some(url) = &cli.api_url {
            config = config.base_url(url);
            config.validate()?;
        }
        debug!("Using portal API at {}", config.base_url);

        let client = PortalClient::from_config(&config)?;
        client.restore_session()?;

        let confirm: Arc<dyn Confirm> = if cli.yes {
            Arc::new(AutoConfirm(true))
        } else {
            Arc::new(StdinConfirm)
        };

        Ok(Self {
            client: Arc::new(client),
            confirm,
            json: cli.json,
        })
    }
}

/// Asks on stderr, reads y/N from stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &Prompt) -> bool {
        let marker = if prompt.destructive { "⚠️ " } else { "" };
        eprint!("{}{}: {} [y/N] ", marker, prompt.title, prompt.message);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
