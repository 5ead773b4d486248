//! Memos CLI - inspect a Memos instance from the terminal
//!
//! Runs the shared client core against a headless document, so every rule
//! the web front-end applies can be observed and scripted.

mod cli;
mod commands;
mod error;
mod terminal;
#[cfg(test)]
mod tests;

use clap::Parser;
use tokio::task::LocalSet;

use crate::cli::{Cli, Commands, PrefsCommands, ResourceCommands, SessionCommands};
use crate::commands::common::GlobalOptions;
use crate::commands::prefs::{run_prefs_set, run_prefs_show};
use crate::commands::resources::{run_resources_list, run_resources_prune};
use crate::commands::session::{run_session_clear, run_session_use};
use crate::commands::status::run_status;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let local = LocalSet::new();
    if let Err(error) = local.run_until(run(&local)).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(local: &LocalSet) -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("memos=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = GlobalOptions::from(&cli);

    match cli.command {
        Commands::Status { json, follow } => run_status(&options, local, json, follow).await?,
        Commands::Prefs { command } => match command {
            PrefsCommands::Show { json } => run_prefs_show(&options, json).await?,
            PrefsCommands::Set { locale, appearance } => {
                run_prefs_set(&options, locale.as_deref(), appearance.map(Into::into)).await?;
            }
        },
        Commands::Resources { command } => match command {
            ResourceCommands::List { json, order } => {
                run_resources_list(&options, json, order.into()).await?;
            }
            ResourceCommands::Prune { yes } => run_resources_prune(&options, yes).await?,
        },
        Commands::Session { command } => match command {
            SessionCommands::Use { username } => run_session_use(&options, &username).await?,
            SessionCommands::Clear => run_session_clear(&options).await?,
        },
    }

    Ok(())
}
