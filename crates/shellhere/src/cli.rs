//! Command-line front end and composition root.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::command::{CommandOutcome, OpenShellHere};
use crate::app::launcher::ShellLauncher;
use crate::app::resolver::{MultiSelectPolicy, SelectionResolver};
use crate::domain::model::{CandidateShell, CommandId};
use crate::infra::config::Config;
use crate::infra::platform::{self, PlatformRoots};
use crate::infra::process::SystemSpawner;
use crate::infra::snapshot::SelectionSnapshot;

#[derive(Debug, Parser)]
#[command(
    name = "shellhere",
    author,
    version,
    about = "Open PowerShell in the folder of the current selection",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extra config file layered over the user config
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub open: OpenArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open a shell in the folder of the selection (the default)
    Open(OpenArgs),
    /// Print the ordered list of shells that would be tried
    Candidates {
        /// Show where each candidate currently resolves to
        #[arg(long)]
        resolve: bool,
        #[command(flatten)]
        shells: ShellArgs,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the identifier hosts use to bind the menu command
    CommandId,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ShellArgs {
    /// Shell to try before the configured candidates (repeatable, tried in order)
    #[arg(long = "shell", value_name = "PROGRAM")]
    pub shells: Vec<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct OpenArgs {
    /// Selected items; a file opens in its parent folder
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Solution folder or solution file used when nothing is selected
    #[arg(long, value_name = "PATH")]
    pub solution: Option<PathBuf>,

    /// Read the selection from a JSON snapshot written by the host ("-" for stdin)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["paths", "solution"])]
    pub selection_file: Option<PathBuf>,

    #[command(flatten)]
    pub shells: ShellArgs,

    /// Wait for the shell to exit (default everywhere but Windows)
    #[arg(long, conflicts_with = "detach")]
    pub wait: bool,

    /// Return immediately and leave the shell running
    #[arg(long)]
    pub detach: bool,

    /// What to do with a multi-item selection: first or reject
    #[arg(long, value_name = "POLICY")]
    pub multi_select: Option<MultiSelectPolicy>,
}

impl OpenArgs {
    /// Selection state for this invocation, anchored at `cwd`.
    ///
    /// Without any paths, solution, or snapshot file the current directory acts as the solution.
    pub fn snapshot(&self, cwd: &Path) -> Result<SelectionSnapshot> {
        let snapshot = match &self.selection_file {
            Some(file) => SelectionSnapshot::load(file)?,
            None if self.paths.is_empty() && self.solution.is_none() => {
                SelectionSnapshot::new(Vec::new(), Some(cwd.to_path_buf()))
            }
            None => SelectionSnapshot::new(self.paths.clone(), self.solution.clone()),
        };
        Ok(snapshot.anchored_at(cwd))
    }

    fn apply(&self, config: &mut Config) {
        self.shells.apply(config);
        if self.wait {
            config.launcher.set_wait(true);
        } else if self.detach {
            config.launcher.set_wait(false);
        }
        if let Some(policy) = self.multi_select {
            config.selection.set_multi_select(policy);
        }
    }
}

impl ShellArgs {
    fn apply(&self, config: &mut Config) {
        for shell in self.shells.iter().rev() {
            config.launcher.prepend(shell.clone());
        }
    }
}

/// Wire the command from configuration, the way a host would once at startup.
pub fn build_command(config: &Config, roots: &PlatformRoots) -> OpenShellHere<SystemSpawner> {
    let resolver = SelectionResolver::new(config.selection.multi_select());
    let launcher = ShellLauncher::new(
        config.launcher.candidate_chain(roots),
        SystemSpawner::new(config.launcher.wait()),
    );
    OpenShellHere::new(resolver, launcher)
}

/// One line per candidate, numbered in the order they are tried.
pub fn render_candidates(
    candidates: &[CandidateShell],
    locate: impl Fn(&CandidateShell) -> Option<PathBuf>,
    resolve: bool,
) -> String {
    let mut out = String::new();
    for (index, candidate) in candidates.iter().enumerate() {
        let _ = write!(out, "{}. {}", index + 1, candidate);
        if resolve {
            match locate(candidate) {
                Some(path) => {
                    let _ = write!(out, " -> {}", path.display());
                }
                None => out.push_str(" (not found)"),
            }
        }
        out.push('\n');
    }
    out
}

pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        command,
        open,
        ..
    } = cli;

    match command.unwrap_or(Commands::Open(open)) {
        Commands::Open(args) => run_open(config_path.as_deref(), &args),
        Commands::Candidates { resolve, shells } => {
            let mut config = Config::load(config_path.as_deref())?;
            shells.apply(&mut config);
            let chain = config.launcher.candidate_chain(&PlatformRoots::from_env());
            print!("{}", render_candidates(&chain, platform::locate, resolve));
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "shellhere", &mut io::stdout());
            Ok(())
        }
        Commands::CommandId => {
            println!("{}", CommandId::OPEN_SHELL_HERE);
            Ok(())
        }
    }
}

fn run_open(config_path: Option<&Path>, args: &OpenArgs) -> Result<()> {
    let mut config = Config::load(config_path)?;
    args.apply(&mut config);

    let cwd = std::env::current_dir().context("unable to determine working directory")?;
    let provider = args.snapshot(&cwd)?;
    let command = build_command(&config, &PlatformRoots::from_env());

    match command.execute(&provider) {
        CommandOutcome::Launched(shell) => {
            tracing::debug!(shell = %shell.executable, "command finished");
        }
        CommandOutcome::NoSelection | CommandOutcome::NoShell => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::model::Selection;
    use crate::domain::model::SelectionProvider;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shellhere").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn bare_invocation_opens_current_directory() -> Result<()> {
        let cli = parse(&[]);
        assert!(cli.command.is_none());

        let cwd = tempfile::tempdir()?;
        let snapshot = cli.open.snapshot(cwd.path())?;
        assert_eq!(snapshot.current_selection().unwrap(), Selection::None);
        assert_eq!(snapshot.solution, Some(cwd.path().to_path_buf()));
        Ok(())
    }

    #[test]
    fn positional_paths_become_the_selection() -> Result<()> {
        let cli = parse(&["src/main.rs", "--solution", "/repo"]);
        let cwd = tempfile::tempdir()?;
        let snapshot = cli.open.snapshot(cwd.path())?;
        assert_eq!(
            snapshot.current_selection().unwrap(),
            Selection::Single(cwd.path().join("src/main.rs"))
        );
        assert_eq!(snapshot.solution, Some(PathBuf::from("/repo")));
        Ok(())
    }

    #[test]
    fn selection_file_conflicts_with_paths() {
        let result = Cli::try_parse_from(["shellhere", "a.txt", "--selection-file", "s.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn shell_flags_keep_their_order_ahead_of_config() {
        let cli = parse(&["open", "--shell", "nu", "--shell", "fish", "--multi-select", "reject"]);
        let Some(Commands::Open(args)) = cli.command else {
            panic!("expected open subcommand");
        };

        let mut config = Config::default();
        args.apply(&mut config);
        let chain = config.launcher.candidate_chain(&PlatformRoots::default());
        assert_eq!(chain[0].program, "nu");
        assert_eq!(chain[1].program, "fish");
        assert_eq!(config.selection.multi_select(), MultiSelectPolicy::Reject);
    }

    #[test]
    fn detach_overrides_the_platform_wait_default() {
        let cli = parse(&["--detach"]);
        let mut config = Config::default();
        cli.open.apply(&mut config);
        assert!(!config.launcher.wait());

        let cli = parse(&["--wait"]);
        let mut config = Config::default();
        config.launcher.set_wait(false);
        cli.open.apply(&mut config);
        assert!(config.launcher.wait());

        assert!(Cli::try_parse_from(["shellhere", "--wait", "--detach"]).is_err());
    }

    #[test]
    fn render_marks_unresolved_candidates() {
        let chain = vec![CandidateShell::new("pwsh"), CandidateShell::new("powershell")];
        let rendered = render_candidates(
            &chain,
            |candidate| (candidate.program == "pwsh").then(|| PathBuf::from("/bin/pwsh")),
            true,
        );
        assert_eq!(rendered, "1. pwsh -> /bin/pwsh\n2. powershell (not found)\n");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
