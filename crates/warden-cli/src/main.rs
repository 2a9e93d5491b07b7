//! Warden CLI
//!
//! Command-line interface for checking content access rules.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::Parser;
use warden_cli::cli::{Args, Command};
use warden_cli::commands::{self, Session};
use warden_cli::config_handlers::handle_config_command;
use warden_cli::WardenConfig;

fn init_logging(verbose: u8, configured: &str) {
    let fallback = match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let Args {
        config,
        content,
        verbose,
        json,
        command,
    } = Args::parse();

    if let Command::Config { action } = command {
        init_logging(verbose, "warn");
        handle_config_command(config.as_deref(), action)?;
        return Ok(ExitCode::SUCCESS);
    }

    let settings = WardenConfig::load(config.as_deref())?;
    init_logging(verbose, &settings.log_level);

    let report = match commands::run_offline(&command) {
        Some(report) => report?,
        None => {
            let root = content.unwrap_or_else(|| settings.content_root.clone());
            tracing::info!(root = %root.display(), "Loading content tree");
            let session = Session::load_with_templates(
                &root,
                settings.access.clone(),
                settings.templates.clone(),
            )
            .await?;
            commands::run_with_session(&session, &command)
                .ok_or_else(|| anyhow!("command does not operate on a content tree"))?
        }
    };

    let mut out = std::io::stdout().lock();
    report.write_to(&mut out, json)?;
    Ok(report.status.into())
}
