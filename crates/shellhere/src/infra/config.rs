//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::resolver::MultiSelectPolicy;
use crate::domain::model::CandidateShell;
use crate::infra::platform::{DEFAULT_MODERN_VERSION, PlatformRoots, default_candidates};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Layered configuration loaded from defaults, user config, an explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub launcher: Launcher,
    #[serde(default)]
    pub selection: SelectionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Launcher {
    #[serde(default)]
    candidates: Option<Vec<String>>,
    #[serde(default)]
    extra: Option<Vec<String>>,
    #[serde(default)]
    modern_version: Option<String>,
    #[serde(default)]
    wait: Option<bool>,
}

impl Launcher {
    /// Explicitly configured candidates; empty means the platform defaults apply.
    pub fn candidates(&self) -> &[String] {
        self.candidates.as_deref().unwrap_or_default()
    }

    pub fn extra(&self) -> &[String] {
        self.extra.as_deref().unwrap_or_default()
    }

    pub fn modern_version(&self) -> &str {
        self.modern_version
            .as_deref()
            .filter(|version| !version.trim().is_empty())
            .unwrap_or(DEFAULT_MODERN_VERSION)
    }

    /// Whether to block on the launched shell. Defaults to waiting except on Windows: elsewhere
    /// the shell shares the invoking terminal and is stopped once it is left in the background.
    pub fn wait(&self) -> bool {
        self.wait.unwrap_or(cfg!(not(windows)))
    }

    pub fn set_wait(&mut self, wait: bool) {
        self.wait = Some(wait);
    }

    /// Put `program` at the very front of the chain.
    pub fn prepend(&mut self, program: impl Into<String>) {
        self.extra.get_or_insert_with(Vec::new).insert(0, program.into());
    }

    /// The effective, ordered candidate chain. Duplicates keep their first position.
    pub fn candidate_chain(&self, roots: &PlatformRoots) -> Vec<CandidateShell> {
        let base: Vec<CandidateShell> = if self.candidates().is_empty() {
            default_candidates(roots, self.modern_version())
        } else {
            self.candidates()
                .iter()
                .map(|program| CandidateShell::new(program.as_str()))
                .collect()
        };

        let mut chain: Vec<CandidateShell> = Vec::with_capacity(self.extra().len() + base.len());
        let extra = self
            .extra()
            .iter()
            .map(|program| CandidateShell::new(program.as_str()));
        for candidate in extra.chain(base) {
            if candidate.program.trim().is_empty() || chain.contains(&candidate) {
                continue;
            }
            chain.push(candidate);
        }
        chain
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SelectionSettings {
    #[serde(default)]
    multi_select: Option<MultiSelectPolicy>,
}

impl SelectionSettings {
    pub fn multi_select(&self) -> MultiSelectPolicy {
        self.multi_select.unwrap_or_default()
    }

    pub fn set_multi_select(&mut self, policy: MultiSelectPolicy) {
        self.multi_select = Some(policy);
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    shell: Option<String>,
    multi_select: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            shell: env::var("SHELLHERE_SHELL").ok(),
            multi_select: env::var("SHELLHERE_MULTI_SELECT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(shell: &str, multi_select: &str) -> Self {
        Self {
            shell: Some(shell.to_owned()),
            multi_select: Some(multi_select.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the user config, an optional explicit file, and env
    /// overrides. Nothing is ever written back.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        if let Some(path) = explicit.filter(|path| !path.exists()) {
            return Err(anyhow!("config file not found: {}", path.display()));
        }
        Self::load_with_layers(global, explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(explicit_path) = explicit.filter(|path| path.exists()) {
            layers.push(Self::from_file(&explicit_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            launcher: merge_launcher(self.launcher, other.launcher),
            selection: merge_selection(self.selection, other.selection),
        }
    }
}

fn merge_launcher(mut base: Launcher, overlay: Launcher) -> Launcher {
    if let Some(candidates) = overlay.candidates.filter(|list| !list.is_empty()) {
        base.candidates = Some(candidates);
    }
    if let Some(extra) = overlay.extra {
        let mut merged = extra;
        for program in base.extra.take().unwrap_or_default() {
            if !merged.contains(&program) {
                merged.push(program);
            }
        }
        base.extra = Some(merged);
    }
    if let Some(version) = overlay.modern_version {
        base.modern_version = Some(version);
    }
    if let Some(wait) = overlay.wait {
        base.wait = Some(wait);
    }
    base
}

fn merge_selection(mut base: SelectionSettings, overlay: SelectionSettings) -> SelectionSettings {
    if let Some(policy) = overlay.multi_select {
        base.multi_select = Some(policy);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("shellhere/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(shell) = env.shell.filter(|shell| !shell.trim().is_empty()) {
        config.launcher.prepend(shell);
    }
    if let Some(policy) = env.multi_select {
        let policy = policy
            .parse::<MultiSelectPolicy>()
            .map_err(|err| anyhow!(err))
            .context("invalid SHELLHERE_MULTI_SELECT")?;
        config.selection.set_multi_select(policy);
    }
    Ok(config)
}
