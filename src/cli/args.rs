// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// refcheck - commit policy checks for pushed refs
///
/// Validates the commits introduced by ref updates against the configured
/// rules. Runs as a server-side `pre-receive` or `update` hook.
#[derive(Parser, Debug)]
#[command(name = "refcheck")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Commit policy checks for pushed refs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Repository to validate (defaults to the current directory)
    #[arg(long, global = true, env = "GIT_DIR")]
    pub repo: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format for the report
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Report findings without refusing the update
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Name of the user pushing
    #[arg(long, global = true, env = "REFCHECK_PUSHER_NAME")]
    pub pusher_name: Option<String>,

    /// Email of the user pushing
    #[arg(long, global = true, env = "REFCHECK_PUSHER_EMAIL")]
    pub pusher_email: Option<String>,
}

/// Output format for CI and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output (default)
    Text,
    /// JSON output for machine parsing
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the ref updates read from stdin (pre-receive hook)
    PreReceive,

    /// Validate a single ref update (update hook)
    Update(UpdateArgs),

    /// Validate the commits a merge proposal would bring in
    Proposal(ProposalArgs),

    /// Manage server-side hooks
    Hooks(HooksArgs),

    /// Write an example configuration
    Init(InitArgs),

    /// Print version information
    Version,
}

/// Arguments for the update command, in git's `update` hook order.
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Name of the ref being updated
    pub ref_name: String,

    /// Old object id
    pub old: String,

    /// New object id
    pub new: String,
}

/// Arguments for the proposal command.
#[derive(Parser, Debug, Clone)]
pub struct ProposalArgs {
    /// Source ref of the proposal
    #[arg(long)]
    pub from_ref: String,

    /// Commit at the tip of the source ref
    #[arg(long)]
    pub from_hash: String,

    /// Target ref of the proposal
    #[arg(long)]
    pub to_ref: String,

    /// Commit at the tip of the target ref
    #[arg(long)]
    pub to_hash: String,
}

/// Arguments for the hooks command.
#[derive(Parser, Debug, Clone)]
pub struct HooksArgs {
    /// Hook action to perform
    #[command(subcommand)]
    pub action: HooksAction,
}

/// Hook actions.
#[derive(Subcommand, Debug, Clone)]
pub enum HooksAction {
    /// Install server-side hooks
    Install {
        /// Specific hook to install
        #[arg(value_name = "HOOK")]
        hook: Option<String>,

        /// Force overwrite existing hooks
        #[arg(short, long)]
        force: bool,
    },

    /// Uninstall server-side hooks
    Uninstall {
        /// Specific hook to uninstall
        #[arg(value_name = "HOOK")]
        hook: Option<String>,
    },

    /// Show hook status
    Status,
}

/// Arguments for the init command.
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update() {
        let args = Cli::parse_from(["refcheck", "update", "refs/heads/main", "aaa", "bbb"]);
        if let Commands::Update(update) = args.command {
            assert_eq!(update.ref_name, "refs/heads/main");
            assert_eq!(update.old, "aaa");
            assert_eq!(update.new, "bbb");
        } else {
            panic!("Expected Update command");
        }
    }

    #[test]
    fn test_parse_proposal() {
        let args = Cli::parse_from([
            "refcheck",
            "proposal",
            "--from-ref",
            "refs/heads/feature",
            "--from-hash",
            "aaa",
            "--to-ref",
            "refs/heads/main",
            "--to-hash",
            "bbb",
        ]);
        assert!(matches!(args.command, Commands::Proposal(_)));
    }

    #[test]
    fn test_parse_hooks() {
        let args = Cli::parse_from(["refcheck", "hooks", "install", "--force"]);
        assert!(matches!(args.command, Commands::Hooks(_)));
    }

    #[test]
    fn test_global_flags() {
        let args = Cli::parse_from([
            "refcheck",
            "pre-receive",
            "--dry-run",
            "--format",
            "json",
            "--pusher-name",
            "ann",
        ]);
        assert!(args.dry_run);
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.pusher_name.as_deref(), Some("ann"));
    }
}
