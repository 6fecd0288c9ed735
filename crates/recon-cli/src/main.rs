//! CMS reconciliation CLI
//!
//! Registers content instances, snapshots their blocks and pages, compares
//! and diffs two instances, and syncs records from one to the other.

mod cli;
mod commands;
mod config;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} CMS reconciliation CLI", "recon".green().bold());
        println!();
        println!("Run {} for available commands.", "recon --help".cyan());
        return Ok(());
    };

    let ctx = AppContext::load(cli.config.as_deref(), cli.data_dir.as_deref())?;
    execute_command(&ctx, command).await
}

async fn execute_command(ctx: &AppContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Instance { action } => commands::run_instance(ctx, action).await,
        Commands::Refresh {
            instance,
            record_type,
        } => commands::run_refresh(ctx, &instance, record_type).await,
        Commands::Compare {
            source,
            destination,
            record_type,
            refresh,
            show,
            json,
        } => {
            commands::run_compare(ctx, &source, &destination, record_type, refresh, show, json)
                .await
        }
        Commands::Diff {
            source,
            destination,
            record_type,
            identifier,
            json,
        } => commands::run_diff(ctx, &source, &destination, record_type, &identifier, json),
        Commands::Plan {
            source,
            destination,
            record_type,
            items,
            json,
        } => commands::run_plan(ctx, &source, &destination, record_type, &items, json),
        Commands::Sync {
            source,
            destination,
            record_type,
            items,
            concurrency,
            json,
        } => {
            commands::run_sync(
                ctx,
                &source,
                &destination,
                record_type,
                &items,
                concurrency,
                json,
            )
            .await
        }
        Commands::History { limit, json } => commands::run_history(ctx, limit, json),
        Commands::Status { run_id, json } => commands::run_status(ctx, &run_id, json),
    }
}
