//! Domain models for selections, shell candidates, and launch requests.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::errors::ProviderError;

/// What the host reports as currently selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Nothing is selected and no hierarchy is active.
    None,
    /// A single file, folder, or project item.
    Single(PathBuf),
    /// Several items selected at once, in host order.
    Multiple(Vec<PathBuf>),
}

impl Selection {
    /// Build a selection from an ordered list of item paths.
    pub fn from_items(mut items: Vec<PathBuf>) -> Self {
        match items.len() {
            0 => Selection::None,
            1 => Selection::Single(items.remove(0)),
            _ => Selection::Multiple(items),
        }
    }
}

/// Capability exposed by the host for introspecting its current UI state.
///
/// `release` is invoked once after every query, on success and failure alike, so providers
/// backed by native handles can drop whatever `current_selection` acquired.
pub trait SelectionProvider {
    /// Report the current selection.
    fn current_selection(&self) -> Result<Selection, ProviderError>;

    /// Root path of the open solution, if any.
    fn solution_root(&self) -> Result<Option<PathBuf>, ProviderError>;

    /// Release transient handles acquired while querying.
    fn release(&self) {}
}

/// One entry in the ordered fallback list probed by the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateShell {
    pub program: String,
}

impl CandidateShell {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether the candidate is a bare executable name left to the search path.
    pub fn is_bare(&self) -> bool {
        let path = Path::new(&self.program);
        path.components().count() == 1 && !path.has_root()
    }
}

impl fmt::Display for CandidateShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)
    }
}

impl From<&str> for CandidateShell {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CandidateShell {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A single spawn attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub working_directory: PathBuf,
    pub executable: String,
}

/// A shell that was started successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedShell {
    pub executable: String,
    pub working_directory: PathBuf,
    pub pid: Option<u32>,
}

/// Identifier the host uses to route the menu command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandId {
    pub group: &'static str,
    pub id: u32,
}

impl CommandId {
    /// The "open shell here" context menu command.
    pub const OPEN_SHELL_HERE: CommandId = CommandId {
        group: "0dc193e5-18d2-4acc-8438-d01ddc43b95a",
        id: 0x0100,
    };
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}:{:#06x}", self.group, self.id)
    }
}
