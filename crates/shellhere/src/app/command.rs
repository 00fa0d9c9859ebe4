//! The "open shell here" command: resolve a folder, then launch a shell in it.

use crate::app::launcher::{ProcessSpawner, ShellLauncher};
use crate::app::resolver::SelectionResolver;
use crate::domain::model::{CommandId, LaunchedShell, SelectionProvider};

/// Result of one invocation. Failures are already logged; callers treat them as no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Launched(LaunchedShell),
    NoSelection,
    NoShell,
}

impl CommandOutcome {
    pub fn launched(&self) -> Option<&LaunchedShell> {
        match self {
            CommandOutcome::Launched(shell) => Some(shell),
            _ => None,
        }
    }
}

/// Built once by the composition root and invoked for every trigger of the menu command.
#[derive(Debug, Clone)]
pub struct OpenShellHere<S> {
    resolver: SelectionResolver,
    launcher: ShellLauncher<S>,
}

impl<S: ProcessSpawner> OpenShellHere<S> {
    pub const ID: CommandId = CommandId::OPEN_SHELL_HERE;

    pub fn new(resolver: SelectionResolver, launcher: ShellLauncher<S>) -> Self {
        Self { resolver, launcher }
    }

    pub fn launcher(&self) -> &ShellLauncher<S> {
        &self.launcher
    }

    pub fn resolver(&self) -> &SelectionResolver {
        &self.resolver
    }

    pub fn execute(&self, provider: &dyn SelectionProvider) -> CommandOutcome {
        let folder = match self.resolver.resolve_folder(provider) {
            Ok(folder) => folder,
            Err(err) => {
                match std::error::Error::source(&err) {
                    Some(cause) => tracing::warn!(error = %err, %cause, "nothing to open"),
                    None => tracing::warn!(error = %err, "nothing to open"),
                }
                return CommandOutcome::NoSelection;
            }
        };

        match self.launcher.launch_shell_in(&folder) {
            Ok(shell) => CommandOutcome::Launched(shell),
            Err(err) => {
                tracing::warn!(error = %err, directory = %folder.display(), "no shell launched");
                CommandOutcome::NoShell
            }
        }
    }
}
