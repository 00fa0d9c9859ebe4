//! Spawning shells as real OS processes.

use std::io;
use std::process::{Command, Stdio};

use crate::app::launcher::ProcessSpawner;
use crate::domain::model::LaunchRequest;

/// Starts the executable directly (never through a shell interpreter) with no arguments.
///
/// The child is left running on its own. With `wait` set the spawner blocks until it exits,
/// which is handy when invoked from a terminal on platforms without a separate console window.
#[derive(Debug, Default, Clone)]
pub struct SystemSpawner {
    wait: bool,
}

impl SystemSpawner {
    pub fn new(wait: bool) -> Self {
        Self { wait }
    }

    pub fn waits(&self) -> bool {
        self.wait
    }

    fn command(request: &LaunchRequest) -> Command {
        let mut command = Command::new(&request.executable);
        command
            .current_dir(&request.working_directory)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            use windows_sys::Win32::System::Threading::CREATE_NEW_CONSOLE;
            command.creation_flags(CREATE_NEW_CONSOLE);
        }

        command
    }
}

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, request: &LaunchRequest) -> io::Result<Option<u32>> {
        let mut child = Self::command(request).spawn()?;
        let pid = child.id();

        if self.wait {
            // The shell did start; a failed wait must not send the launcher to the next candidate.
            match child.wait() {
                Ok(status) => tracing::debug!(pid, %status, "shell exited"),
                Err(err) => tracing::warn!(pid, error = %err, "failed to wait for shell"),
            }
        }

        Ok(Some(pid))
    }
}
