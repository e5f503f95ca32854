//! MindCare - session and SOS alert coordination
//!
//! CLI entry point for the console, the demo and the user listing.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info};

use mindcare::auth::{LoginStore, UserDirectory};
use mindcare::cli::{Cli, Command, generate_after_help};
use mindcare::config::Config;
use mindcare::console::{Console, render_user};
use mindcare::demo::run_demo;
use mindcare::desk::CareDesk;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logging isn't initialized yet, so nothing here can be traced
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mindcare")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("mindcare.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Demo { fast }) => {
            debug!(fast, "main: matched Demo command");
            run_demo(&config, fast).await
        }
        Some(Command::Users) => {
            debug!("main: matched Users command");
            cmd_users()
        }
        Some(Command::Console) | None => {
            debug!("main: launching console");
            cmd_console(&config).await
        }
    }
}

/// List the demo accounts
fn cmd_users() -> Result<()> {
    debug!("cmd_users: called");
    for user in UserDirectory::seeded().all() {
        println!("{}", render_user(user));
    }
    Ok(())
}

/// Run the interactive console
async fn cmd_console(config: &Config) -> Result<()> {
    debug!("cmd_console: called");
    let desk = CareDesk::start(config);
    let store = LoginStore::new(&config.auth.store_dir);
    let mut console = Console::new(desk.clone(), UserDirectory::seeded(), store);
    let result = console.run().await;
    desk.shutdown().await;
    result
}
