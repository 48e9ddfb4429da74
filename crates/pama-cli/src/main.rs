//! pama CLI
//!
//! Tracks emailed patches applied to a repository across history rewrites.

mod cli;
mod commands;
mod error;
mod mbox;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use pama_core::{Config, PatchManager};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::ApplyArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(cmd) = cli.command else {
        println!("{} Patch Manager", "pama".green().bold());
        println!();
        println!("Run {} for available commands.", "pama --help".cyan());
        return Ok(());
    };

    if let Commands::Completions { shell } = cmd {
        clap_complete::generate(shell, &mut Cli::command(), "pama", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load()?;
    tracing::debug!(?config, "Loaded config");
    let mgr = PatchManager::new(&config)?;
    execute_command(&mgr, &config, cmd)
}

/// Log to stderr; `-v` enables debug output unless `RUST_LOG` is set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(io::stderr)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(mgr: &PatchManager, config: &Config, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init { name, force } => {
            let cwd = std::env::current_dir()?;
            commands::run_init(mgr, &cwd, name.as_deref(), force)
        }
        Commands::List { all, filter } => commands::run_list(mgr, all, filter.as_deref()),
        Commands::Switch { name } => commands::run_switch(mgr, &name),
        Commands::Delete { name } => commands::run_delete(mgr, name.as_deref()),
        Commands::Unlink { name } => commands::run_unlink(mgr, name.as_deref()),
        Commands::Apply {
            tag,
            cmd,
            worktree,
            mbox,
        } => commands::run_apply(
            mgr,
            config,
            &ApplyArgs {
                tag,
                cmd,
                worktree,
                mbox,
            },
        ),
        Commands::Drop { tag } => commands::run_drop(mgr, &tag),
        Commands::Remove { tag } => commands::run_remove(mgr, &tag),
        Commands::Rebase { commit } => commands::run_rebase(mgr, &config.editor(), commit.as_deref()),
        Commands::Find { hash } => commands::run_find(mgr, &hash),
        Commands::Propose { project } => commands::run_propose(mgr, project),
        Commands::Completions { .. } => Ok(()),
    }
}
