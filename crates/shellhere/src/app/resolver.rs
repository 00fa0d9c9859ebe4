//! Reducing the host's current selection to a working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::ResolveError;
use crate::domain::model::{Selection, SelectionProvider};

/// How to treat a selection spanning several items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiSelectPolicy {
    /// Use the first selected item.
    #[default]
    First,
    /// Refuse to pick an item.
    Reject,
}

impl std::str::FromStr for MultiSelectPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown multi-select policy: {other}")),
        }
    }
}

/// Queries a [`SelectionProvider`] and yields the folder a shell should open in.
#[derive(Debug, Default, Clone)]
pub struct SelectionResolver {
    policy: MultiSelectPolicy,
}

impl SelectionResolver {
    pub fn new(policy: MultiSelectPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MultiSelectPolicy {
        self.policy
    }

    /// Resolve the directory of the current selection.
    ///
    /// Falls back to the solution root when nothing is selected. A selected file, or a solution
    /// root that is a file, resolves to its parent directory; directories are returned unchanged.
    pub fn resolve_folder(
        &self,
        provider: &dyn SelectionProvider,
    ) -> Result<PathBuf, ResolveError> {
        let _release = ReleaseGuard(provider);

        let item = match provider.current_selection()? {
            Selection::None => {
                return provider
                    .solution_root()?
                    .filter(|path| !path.as_os_str().is_empty())
                    .and_then(|root| solution_folder(&root))
                    .ok_or_else(ResolveError::empty);
            }
            Selection::Single(path) => path,
            Selection::Multiple(paths) => self.pick(paths)?,
        };

        folder_of(&item).ok_or_else(ResolveError::empty)
    }

    fn pick(&self, paths: Vec<PathBuf>) -> Result<PathBuf, ResolveError> {
        match self.policy {
            MultiSelectPolicy::First => paths
                .into_iter()
                .find(|path| !path.as_os_str().is_empty())
                .ok_or_else(ResolveError::empty),
            MultiSelectPolicy::Reject => {
                tracing::debug!(count = paths.len(), "multi-item selection rejected");
                Err(ResolveError::empty())
            }
        }
    }
}

/// Directory for the solution root: a solution file opens in its folder, anything else is
/// already the root directory.
fn solution_folder(root: &Path) -> Option<PathBuf> {
    if root.is_file() {
        folder_of(root)
    } else {
        Some(root.to_path_buf())
    }
}

fn ends_with_separator(path: &Path) -> bool {
    path.to_string_lossy()
        .chars()
        .last()
        .is_some_and(std::path::is_separator)
}

struct ReleaseGuard<'a>(&'a dyn SelectionProvider);

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// Directory an item path should open in.
///
/// A path spelled with a trailing separator names a folder even when it no longer exists.
fn folder_of(item: &Path) -> Option<PathBuf> {
    if item.as_os_str().is_empty() {
        return None;
    }
    if item.is_dir() {
        return Some(item.to_path_buf());
    }
    if ends_with_separator(item) {
        return Some(item.components().collect());
    }
    item.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
