//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// pama - Track emailed patches across history rewrites
#[derive(Parser, Debug)]
#[command(name = "pama")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start tracking the repository in the current directory
    ///
    /// The current HEAD becomes the base of the project.
    ///
    /// Examples:
    ///   pama init              # Name the project after the directory
    ///   pama init aerc -f      # Replace an existing 'aerc' project
    Init {
        /// Project name (defaults to the directory name)
        name: Option<String>,

        /// Overwrite an existing project of the same name
        #[arg(short, long)]
        force: bool,
    },

    /// Show the current project, or all projects
    #[command(alias = "ls")]
    List {
        /// Show all projects
        #[arg(short, long)]
        all: bool,

        /// Only show projects whose name contains this text
        filter: Option<String>,
    },

    /// Make another project current
    Switch {
        /// Project name
        name: String,
    },

    /// Forget a project
    Delete {
        /// Project name (defaults to the current project)
        name: Option<String>,
    },

    /// Forget a project and remove its worktree, if it has one
    Unlink {
        /// Project name (defaults to the current project)
        name: Option<String>,
    },

    /// Apply a mailbox and track the new commits under a patch tag
    ///
    /// The mailbox is piped into the apply command. Message ids are read
    /// from its headers and attached to the matching commits.
    ///
    /// Examples:
    ///   pama apply notmuch_v3 series.mbox
    ///   pama apply notmuch_v3 -c 'git -C %r am' < series.mbox
    ///   pama apply notmuch_v3 -w HEAD~2 series.mbox
    Apply {
        /// Patch tag
        tag: String,

        /// Custom apply command; %r expands to the project root
        #[arg(short = 'c', long = "cmd")]
        cmd: Option<String>,

        /// Apply in a new worktree checked out at this commit
        #[arg(short, long)]
        worktree: Option<String>,

        /// Mailbox file (reads stdin when omitted)
        mbox: Option<PathBuf>,
    },

    /// Discard all commits of a patch from history
    Drop {
        /// Patch tag
        tag: String,
    },

    /// Remove all commits of a patch from history
    Remove {
        /// Patch tag
        tag: String,
    },

    /// Re-assign patch tags after the history changed
    ///
    /// Opens the commits since the base in an editor. Exiting the editor
    /// with an error aborts without saving.
    Rebase {
        /// New base commit (defaults to the project base)
        commit: Option<String>,
    },

    /// Look up a commit by a partial hash
    Find {
        /// At least four characters of the commit hash
        hash: String,
    },

    /// Propose patch tags for email subjects read from stdin
    Propose {
        /// Print the projects the subjects are addressed to instead
        #[arg(short, long)]
        project: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_apply() {
        let cli = Cli::parse_from(["pama", "apply", "fix_v1", "-c", "git -C %r am", "x.mbox"]);
        assert_eq!(
            cli.command,
            Some(Commands::Apply {
                tag: "fix_v1".into(),
                cmd: Some("git -C %r am".into()),
                worktree: None,
                mbox: Some(PathBuf::from("x.mbox")),
            })
        );
    }

    #[test]
    fn parse_list_alias() {
        let cli = Cli::parse_from(["pama", "ls", "-a"]);
        assert_eq!(
            cli.command,
            Some(Commands::List {
                all: true,
                filter: None
            })
        );
    }

    #[test]
    fn parse_propose_project_flag() {
        let cli = Cli::parse_from(["pama", "propose", "-p"]);
        assert_eq!(cli.command, Some(Commands::Propose { project: true }));
        let cli = Cli::parse_from(["pama", "propose"]);
        assert_eq!(cli.command, Some(Commands::Propose { project: false }));
    }

    #[test]
    fn parse_global_verbose() {
        let cli = Cli::parse_from(["pama", "find", "abcd", "-v"]);
        assert!(cli.verbose);
    }
}
