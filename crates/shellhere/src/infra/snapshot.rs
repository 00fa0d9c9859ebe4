//! Selection state handed over by a host as JSON or command-line paths.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::errors::ProviderError;
use crate::domain::model::{Selection, SelectionProvider};

/// Snapshot of what the host had selected when the command was triggered.
///
/// ```json
/// { "items": ["/repo/src/main.rs"], "solution": "/repo" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    /// Selected items in host order.
    #[serde(default)]
    pub items: Vec<PathBuf>,
    /// Root of the open solution, if any.
    #[serde(default)]
    pub solution: Option<PathBuf>,
}

impl SelectionSnapshot {
    pub fn new(items: Vec<PathBuf>, solution: Option<PathBuf>) -> Self {
        Self { items, solution }
    }

    /// Read a snapshot from `path`, or from stdin when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = if path == Path::new("-") {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read selection snapshot from stdin")?;
            buffer
        } else {
            fs::read_to_string(path).with_context(|| {
                format!("failed to read selection snapshot at {}", path.display())
            })?
        };
        Self::from_json(&data)
            .with_context(|| format!("invalid selection snapshot in {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let snapshot = serde_json::from_str(data).context("failed to parse selection JSON")?;
        Ok(snapshot)
    }

    /// Make every path absolute against `base`.
    pub fn anchored_at(self, base: &Path) -> Self {
        let anchor = |path: PathBuf| {
            if path.as_os_str().is_empty() || path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        };
        Self {
            items: self.items.into_iter().map(anchor).collect(),
            solution: self.solution.map(anchor),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.solution.is_none()
    }
}

impl SelectionProvider for SelectionSnapshot {
    fn current_selection(&self) -> Result<Selection, ProviderError> {
        Ok(Selection::from_items(self.items.clone()))
    }

    fn solution_root(&self) -> Result<Option<PathBuf>, ProviderError> {
        Ok(self.solution.clone())
    }
}
