//! Apply command: pipe a mailbox through the apply command and record the
//! resulting commits

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use colored::Colorize;
use pama_core::{Config, PatchManager, Project};

use crate::error::{CliError, Result};
use crate::mbox;

/// Placeholder for the project root in custom apply commands.
const ROOT_PLACEHOLDER: &str = "%r";

/// Arguments of the apply command
#[derive(Debug, Clone, Default)]
pub struct ApplyArgs {
    pub tag: String,
    pub cmd: Option<String>,
    pub worktree: Option<String>,
    pub mbox: Option<PathBuf>,
}

/// Run the apply command
pub fn run_apply(mgr: &PatchManager, config: &Config, args: &ApplyArgs) -> Result<()> {
    let mut p = mgr.current_project()?;
    tracing::trace!(project = ?p, "Current project");

    if let Some(commit) = &args.worktree {
        p = mgr.create_worktree(&p, commit, &args.tag)?;
        if let Err(e) = mgr.switch_project(&p.name) {
            tracing::warn!(error = %e, "could not switch to worktree project");
        }
        println!("{} Worktree {} at {}", "=>".blue().bold(), p.name.cyan(), p.root);
    }

    let prior = mgr.begin_apply(&p, &args.tag)?;
    tracing::trace!(head = %prior, "HEAD commit before");

    let cmd = apply_command(mgr, config, args.cmd.as_deref(), &p)?;
    let input = read_mbox(args.mbox.as_ref())?;
    let msgdata = mbox::message_ids(&mbox::parse(&String::from_utf8_lossy(&input)));

    let status = pipe(&cmd, &input)?;
    if !status.success() {
        tracing::warn!(%cmd, ?status, "apply command failed");
    }

    let p = mgr.apply_update(p, &args.tag, &prior, &msgdata)?;
    if !status.success() {
        return Err(CliError::user(format!(
            "Apply command `{cmd}` failed ({status}); tracked what was applied"
        )));
    }

    let count = p.commits.iter().filter(|c| c.tag == args.tag).count();
    println!(
        "{} Applied {} commit(s) as {}",
        "OK".green().bold(),
        count,
        args.tag.cyan()
    );
    Ok(())
}

/// The command-line flag, then the config, then the backend default.
fn apply_command(
    mgr: &PatchManager,
    config: &Config,
    custom: Option<&str>,
    p: &Project,
) -> Result<String> {
    match custom.or(config.apply_cmd.as_deref()) {
        Some(cmd) => {
            let cmd = cmd.replace(ROOT_PLACEHOLDER, &p.root);
            tracing::info!(%cmd, "use custom apply command");
            Ok(cmd)
        }
        None => Ok(mgr.apply_cmd(p)?),
    }
}

fn read_mbox(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Run `cmd` through the shell with `input` on stdin.
fn pipe(cmd: &str, input: &[u8]) -> Result<std::process::ExitStatus> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take()
        && let Err(e) = stdin.write_all(input)
        && e.kind() != io::ErrorKind::BrokenPipe
    {
        return Err(e.into());
    }
    Ok(child.wait()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_feeds_stdin() {
        let status = pipe("grep -q needle", b"hay\nneedle\n").unwrap();
        assert!(status.success());
        let status = pipe("grep -q needle", b"hay\n").unwrap();
        assert!(!status.success());
    }
}
