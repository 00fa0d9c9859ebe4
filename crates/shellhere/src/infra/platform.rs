//! Well-known shell install locations and the default candidate list.

use std::env;
use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

use crate::domain::model::CandidateShell;

pub const DEFAULT_MODERN_VERSION: &str = "6";

const MODERN_SHELL: &str = "pwsh";
const LEGACY_SHELL: &str = "powershell";

#[cfg(windows)]
const MODERN_SHELL_DIR: &str = "PowerShell";
#[cfg(not(windows))]
const MODERN_SHELL_DIR: &str = "powershell";

/// Install roots probed before falling back to the search path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformRoots {
    /// 64-bit program files root holding versioned modern shell installs.
    pub program_files_64: Option<PathBuf>,
    /// System directory holding the legacy shell.
    pub system_dir: Option<PathBuf>,
}

impl PlatformRoots {
    /// Read the roots from the process environment.
    ///
    /// On Windows the system directory comes from the OS; the `SystemRoot` variables are only a
    /// fallback when that lookup fails.
    pub fn from_env() -> Self {
        let roots = Self::from_vars(|key| env::var(key).ok());
        #[cfg(windows)]
        let roots = Self {
            system_dir: system_directory().or(roots.system_dir),
            ..roots
        };
        roots
    }

    #[cfg(windows)]
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        Self {
            program_files_64: non_empty("ProgramW6432").map(PathBuf::from),
            system_dir: non_empty("SystemRoot")
                .or_else(|| non_empty("windir"))
                .map(|root| PathBuf::from(root).join("System32")),
        }
    }

    #[cfg(not(windows))]
    fn from_vars(_var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            program_files_64: Some(PathBuf::from("/opt/microsoft")),
            system_dir: None,
        }
    }
}

#[cfg(windows)]
fn system_directory() -> Option<PathBuf> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;

    use windows_sys::Win32::System::SystemInformation::GetSystemDirectoryW;

    let mut buffer = vec![0u16; 260];
    loop {
        let capacity = u32::try_from(buffer.len()).ok()?;
        // SAFETY: `buffer` is valid for `capacity` UTF-16 units.
        let len = unsafe { GetSystemDirectoryW(buffer.as_mut_ptr(), capacity) } as usize;
        if len == 0 {
            return None;
        }
        if len < buffer.len() {
            return Some(PathBuf::from(OsString::from_wide(&buffer[..len])));
        }
        // Too small: `len` is the required size including the terminator.
        buffer.resize(len, 0);
    }
}

/// Ordered fallback chain: versioned modern shell, modern shell on the search path, legacy shell
/// in the system directory, legacy shell on the search path.
///
/// Entries whose install root is unknown are left out.
pub fn default_candidates(roots: &PlatformRoots, modern_version: &str) -> Vec<CandidateShell> {
    let modern = format!("{MODERN_SHELL}{EXE_SUFFIX}");
    let legacy = format!("{LEGACY_SHELL}{EXE_SUFFIX}");

    let mut candidates = Vec::with_capacity(4);
    if let Some(root) = &roots.program_files_64 {
        let path = root.join(MODERN_SHELL_DIR).join(modern_version).join(&modern);
        candidates.push(CandidateShell::new(path.display().to_string()));
    }
    candidates.push(CandidateShell::new(modern));
    if let Some(system) = &roots.system_dir {
        let path = system.join("WindowsPowerShell").join("v1.0").join(&legacy);
        candidates.push(CandidateShell::new(path.display().to_string()));
    }
    candidates.push(CandidateShell::new(legacy));
    candidates
}

/// Where a candidate would be found right now, if anywhere.
///
/// Only used for diagnostics; launching always goes through the OS so the search path is
/// consulted at spawn time.
pub fn locate(candidate: &CandidateShell) -> Option<PathBuf> {
    if candidate.is_bare() {
        which::which(&candidate.program).ok()
    } else {
        let path = Path::new(&candidate.program);
        path.is_file().then(|| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn programs(candidates: &[CandidateShell]) -> Vec<String> {
        candidates.iter().map(|c| c.program.clone()).collect()
    }

    #[test]
    fn full_chain_orders_specific_before_generic() {
        let roots = PlatformRoots {
            program_files_64: Some(PathBuf::from("pf")),
            system_dir: Some(PathBuf::from("sys")),
        };
        let chain = default_candidates(&roots, "6");

        let expected = vec![
            Path::new("pf")
                .join(MODERN_SHELL_DIR)
                .join("6")
                .join(format!("pwsh{EXE_SUFFIX}"))
                .display()
                .to_string(),
            format!("pwsh{EXE_SUFFIX}"),
            Path::new("sys")
                .join("WindowsPowerShell")
                .join("v1.0")
                .join(format!("powershell{EXE_SUFFIX}"))
                .display()
                .to_string(),
            format!("powershell{EXE_SUFFIX}"),
        ];
        assert_eq!(programs(&chain), expected);
        assert!(!chain[0].is_bare());
        assert!(chain[1].is_bare());
        assert!(!chain[2].is_bare());
        assert!(chain[3].is_bare());
    }

    #[test]
    fn unknown_roots_leave_only_search_path_entries() {
        let chain = default_candidates(&PlatformRoots::default(), "7");
        assert_eq!(
            programs(&chain),
            vec![format!("pwsh{EXE_SUFFIX}"), format!("powershell{EXE_SUFFIX}")]
        );
    }

    #[test]
    fn modern_version_selects_install_folder() {
        let roots = PlatformRoots {
            program_files_64: Some(PathBuf::from("pf")),
            system_dir: None,
        };
        let chain = default_candidates(&roots, "7");
        assert!(chain[0].program.contains('7'));
    }

    #[cfg(windows)]
    #[test]
    fn windows_roots_come_from_environment() {
        let roots = PlatformRoots::from_vars(|key| match key {
            "ProgramW6432" => Some(r"C:\Program Files".into()),
            "SystemRoot" => Some(r"C:\Windows".into()),
            _ => None,
        });
        assert_eq!(
            roots.program_files_64,
            Some(PathBuf::from(r"C:\Program Files"))
        );
        assert_eq!(
            roots.system_dir,
            Some(PathBuf::from(r"C:\Windows\System32"))
        );
    }

    #[cfg(windows)]
    #[test]
    fn system_directory_comes_from_the_os() {
        let system = system_directory().expect("system directory");
        assert!(system.is_dir());
        assert_eq!(PlatformRoots::from_env().system_dir, Some(system));
    }

    #[cfg(windows)]
    #[test]
    fn blank_program_files_is_ignored() {
        let roots = PlatformRoots::from_vars(|key| match key {
            "ProgramW6432" => Some("  ".into()),
            "windir" => Some(r"C:\Windows".into()),
            _ => None,
        });
        assert_eq!(roots.program_files_64, None);
        assert!(roots.system_dir.is_some());
    }

    #[test]
    fn missing_absolute_candidate_is_not_located() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("pwsh");
        assert_eq!(
            locate(&CandidateShell::new(missing.display().to_string())),
            None
        );
    }

    #[test]
    fn existing_absolute_candidate_is_located() {
        let temp = tempfile::tempdir().unwrap();
        let shell = temp.path().join("pwsh");
        std::fs::write(&shell, "").unwrap();
        assert_eq!(
            locate(&CandidateShell::new(shell.display().to_string())),
            Some(shell)
        );
    }
}
