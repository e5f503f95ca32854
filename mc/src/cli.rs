//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// MindCare - session and SOS alert coordination
#[derive(Parser)]
#[command(
    name = "mc",
    about = "Counseling sessions and SOS alerts for student wellness dashboards",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive console (default)
    Console,

    /// Scripted walkthrough: SOS, acknowledge, session, chat, end
    Demo {
        /// Shorten the pauses and reply delays
        #[arg(short, long)]
        fast: bool,
    },

    /// List the demo user accounts
    Users,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mindcare")
        .join("logs")
        .join("mindcare.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Footer for `--help` pointing at the log file
pub fn generate_after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["mc"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_demo_fast_with_global_flags() {
        let cli = Cli::try_parse_from(["mc", "demo", "--fast", "-l", "debug"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Demo { fast: true })));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_log_path() {
        assert!(get_log_path().ends_with("mindcare/logs/mindcare.log"));
    }
}
