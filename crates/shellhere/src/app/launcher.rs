//! Starting a shell in a directory, falling back through candidate executables.

use std::io;
use std::path::Path;

use crate::domain::errors::LaunchError;
use crate::domain::model::{CandidateShell, LaunchRequest, LaunchedShell};

/// Starts OS processes for launch requests.
///
/// An `Err` means the process never started; the launcher moves on to the next candidate.
pub trait ProcessSpawner {
    fn spawn(&self, request: &LaunchRequest) -> io::Result<Option<u32>>;
}

/// Tries an ordered list of shell candidates until one starts.
#[derive(Debug, Clone)]
pub struct ShellLauncher<S> {
    candidates: Vec<CandidateShell>,
    spawner: S,
}

impl<S: ProcessSpawner> ShellLauncher<S> {
    pub fn new(candidates: Vec<CandidateShell>, spawner: S) -> Self {
        Self {
            candidates,
            spawner,
        }
    }

    pub fn candidates(&self) -> &[CandidateShell] {
        &self.candidates
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Launch exactly one shell in `directory`.
    ///
    /// Candidates are attempted in order, each at most once, stopping at the first process that
    /// starts. Start failures are logged and skipped; only exhausting the list is an error.
    pub fn launch_shell_in(&self, directory: &Path) -> Result<LaunchedShell, LaunchError> {
        if !directory.is_dir() {
            return Err(LaunchError::InvalidDirectory(directory.to_path_buf()));
        }

        let mut attempted = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            let request = LaunchRequest {
                working_directory: directory.to_path_buf(),
                executable: candidate.program.clone(),
            };
            attempted.push(candidate.program.clone());

            match self.spawner.spawn(&request) {
                Ok(pid) => {
                    tracing::info!(
                        shell = %candidate,
                        directory = %directory.display(),
                        ?pid,
                        "shell started"
                    );
                    return Ok(LaunchedShell {
                        executable: request.executable,
                        working_directory: request.working_directory,
                        pid,
                    });
                }
                Err(err) => {
                    tracing::debug!(shell = %candidate, error = %err, "candidate failed to start");
                }
            }
        }

        Err(LaunchError::NoShellAvailable { attempted })
    }
}
