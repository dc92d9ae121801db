// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use crate::commit::{Identity, MergeProposal, RefUpdate};
use crate::config::{find_config_file_from, RefCheckConfig};
use crate::error::{RefCheckError, Result, ResultExt};
use crate::git::{GitResolver, Repository};
use crate::hooks::HookManager;
use crate::host::{CommandIssueTracker, FileUserDirectory, UnconfiguredUserDirectory, UserDirectory};
use crate::render::Renderer;
use crate::rules::RuleSet;
use crate::validator::RefUpdateValidator;
use crate::verification::{BatchVerificationResult, Report};
use std::path::PathBuf;

use super::args::{Cli, Commands, HooksAction, HooksArgs, InitArgs, ProposalArgs, UpdateArgs};

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command.clone() {
        Commands::PreReceive => run_pre_receive(&cli),
        Commands::Update(args) => run_update(&cli, args),
        Commands::Proposal(args) => run_proposal(&cli, args),
        Commands::Hooks(args) => run_hooks(&cli, args),
        Commands::Init(args) => run_init(&cli, args),
        Commands::Version => run_version(),
    }
}

/// Run the pre-receive command.
fn run_pre_receive(cli: &Cli) -> Result<()> {
    let input = std::io::read_to_string(std::io::stdin()).context("reading ref updates")?;
    let updates = RefUpdate::parse_lines(&input)?;

    tracing::debug!("Read {} ref update(s) from stdin", updates.len());

    validate(cli, |validator| validator.validate_batch(&updates))
}

/// Run the update command.
fn run_update(cli: &Cli, args: UpdateArgs) -> Result<()> {
    tracing::debug!("Running update command with args: {:?}", args);

    let update = RefUpdate::parse_line(&format!("{} {} {}", args.old, args.new, args.ref_name))?;
    validate(cli, |validator| validator.validate_batch(&[update]))
}

/// Run the proposal command.
fn run_proposal(cli: &Cli, args: ProposalArgs) -> Result<()> {
    tracing::debug!("Running proposal command with args: {:?}", args);

    let proposal = MergeProposal {
        from_ref_id: args.from_ref,
        from_hash: args.from_hash,
        to_ref_id: args.to_ref,
        to_hash: args.to_hash,
    };
    validate(cli, |validator| validator.validate_merge_proposals(&[proposal]))
}

/// Build a validator for the repository, run `check` with it and report.
fn validate<F>(cli: &Cli, check: F) -> Result<()>
where
    F: FnOnce(&RefUpdateValidator<'_>) -> Result<BatchVerificationResult>,
{
    let config = load_config(cli)?;
    let resolver = GitResolver::open(&repo_path(cli)?)?;

    let file_directory;
    let directory: &dyn UserDirectory = match &config.directory.users_file {
        Some(path) => {
            file_directory = FileUserDirectory::load(path)?;
            &file_directory
        }
        None => &UnconfiguredUserDirectory,
    };
    let tracker = CommandIssueTracker::from_config(&config.issue_tracker);

    let pusher = pusher(cli);
    let mut validator =
        RefUpdateValidator::new(&config, &resolver, RuleSet::standard(directory, &tracker))?;
    if let Some(pusher) = &pusher {
        validator = validator.with_pusher(pusher.clone());
    }

    let batch = check(&validator)?;

    let report = Report::new(&batch, &config.report, pusher.as_ref()).with_dry_run(cli.dry_run);
    let output = report.render(&Renderer::new(), cli.format)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    if report.rejects() {
        return Err(RefCheckError::Rejected { count: batch.len() });
    }
    Ok(())
}

/// Run the hooks command.
fn run_hooks(cli: &Cli, args: HooksArgs) -> Result<()> {
    tracing::debug!("Running hooks command");

    let repo = Repository::open(&repo_path(cli)?)?;
    let manager = HookManager::new(&repo)?;

    match args.action {
        HooksAction::Install { hook, force } => {
            if let Some(hook_name) = hook {
                manager.install_hook(&hook_name, force)?;
                println!("✓ Installed {} hook", hook_name);
            } else {
                manager.install_all(force)?;
                println!("✓ Installed all hooks");
            }
        }
        HooksAction::Uninstall { hook } => {
            if let Some(hook_name) = hook {
                manager.uninstall_hook(&hook_name)?;
                println!("✓ Uninstalled {} hook", hook_name);
            } else {
                manager.uninstall_all()?;
                println!("✓ Uninstalled all hooks");
            }
        }
        HooksAction::Status => {
            for (hook, installed) in manager.status() {
                let icon = if installed { "✓" } else { "✗" };
                println!("{} {}", icon, hook);
            }
        }
    }

    Ok(())
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("refcheck {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}

/// Run the init command.
fn run_init(cli: &Cli, args: InitArgs) -> Result<()> {
    use crate::config::default::example_config;

    tracing::debug!("Running init command with args: {:?}", args);

    let config_path = repo_path(cli)?.join("refcheck.toml");

    if config_path.exists() && !args.force {
        return Err(RefCheckError::WithContext {
            context: "init".to_string(),
            message: "Configuration file already exists. Use --force to overwrite.".to_string(),
        });
    }

    std::fs::write(&config_path, example_config()).context("writing refcheck.toml")?;

    println!("✓ Created {}", config_path.display());

    Ok(())
}

fn repo_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.repo {
        Some(path) => Ok(path.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_config(cli: &Cli) -> Result<RefCheckConfig> {
    if let Some(config_path) = &cli.config {
        return RefCheckConfig::load_from(config_path);
    }

    match find_config_file_from(&repo_path(cli)?) {
        Some(path) => RefCheckConfig::load_from(&path),
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Ok(RefCheckConfig::default())
        }
    }
}

fn pusher(cli: &Cli) -> Option<Identity> {
    if cli.pusher_name.is_none() && cli.pusher_email.is_none() {
        return None;
    }
    Some(Identity::new(
        cli.pusher_name.clone().unwrap_or_default(),
        cli.pusher_email.clone().unwrap_or_default(),
    ))
}
