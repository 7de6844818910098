// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use godot_installer::Layout;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            let _ = e.print();
            return code;
        }
    };

    // Every RunContext is dropped inside `run`, so cleanup has finished by now
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let layout = Layout::from_env()?;

    match command {
        Commands::Install { version } => commands::cmd_install(layout, version.as_deref()),
        Commands::Uninstall { version } => commands::cmd_uninstall(layout, version.as_deref()),
        Commands::Clean => commands::cmd_clean(layout),
        Commands::List => commands::cmd_list(layout),
    }
}
