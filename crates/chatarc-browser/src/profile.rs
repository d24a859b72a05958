use std::path::PathBuf;

/// Directory under the user's home for the dedicated (non-reused) profile.
const DEDICATED_PROFILE_SUBDIR: &str = ".chatarc/profile";

/// Per-OS overrides for the real-profile user-data directory.
#[derive(Debug, Clone, Default)]
pub struct ProfileDirs {
    pub macos: Option<String>,
    pub windows: Option<String>,
    pub linux: Option<String>,
}

impl ProfileDirs {
    fn for_current_os(&self) -> Option<&str> {
        if cfg!(target_os = "macos") {
            self.macos.as_deref()
        } else if cfg!(target_os = "windows") {
            self.windows.as_deref()
        } else {
            self.linux.as_deref()
        }
    }
}

/// Resolve the browser user-data directory based on priority:
/// 1. Explicit directory (with tilde expansion)
/// 2. The configured per-OS directory, when profile reuse is on
/// 3. The OS-default Chrome user-data directory, when profile reuse is on
/// 4. A dedicated profile directory under the user's home
///
/// Reusing the real profile inherits the authenticated session (and avoids
/// bot-challenge loops on a cold profile); the dedicated directory keeps the
/// run isolated at the cost of a manual login.
pub fn resolve_user_data_dir(
    explicit: Option<&str>,
    use_real_profile: bool,
    os_dirs: &ProfileDirs,
) -> PathBuf {
    if let Some(path) = explicit {
        return expand_tilde(path);
    }

    if use_real_profile {
        if let Some(path) = os_dirs.for_current_os() {
            return expand_tilde(path);
        }
        if let Some(dir) = os_default_chrome_dir() {
            return dir;
        }
    }

    dedicated_profile_dir()
}

/// OS-default Chrome user-data directory (the parent of named profiles).
fn os_default_chrome_dir() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library/Application Support/Google/Chrome"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir().map(|d| d.join("Google").join("Chrome").join("User Data"))
    } else {
        dirs::config_dir().map(|d| d.join("google-chrome"))
    }
}

fn dedicated_profile_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEDICATED_PROFILE_SUBDIR)
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same_everywhere(path: &str) -> ProfileDirs {
        ProfileDirs {
            macos: Some(path.to_string()),
            windows: Some(path.to_string()),
            linux: Some(path.to_string()),
        }
    }

    #[test]
    fn test_explicit_dir_wins_over_everything() {
        let dir = resolve_user_data_dir(
            Some("/tmp/chatarc-profile"),
            true,
            &same_everywhere("/tmp/ignored"),
        );
        assert_eq!(dir, PathBuf::from("/tmp/chatarc-profile"));
    }

    #[test]
    fn test_configured_os_dir_wins_when_reusing() {
        let dir = resolve_user_data_dir(None, true, &same_everywhere("/tmp/os-specific"));
        assert_eq!(dir, PathBuf::from("/tmp/os-specific"));
    }

    #[test]
    fn test_os_dirs_ignored_when_not_reusing() {
        let dir = resolve_user_data_dir(None, false, &same_everywhere("/tmp/os-specific"));
        assert!(dir.ends_with(DEDICATED_PROFILE_SUBDIR));
    }

    #[test]
    fn test_tilde_expansion() {
        let dir = resolve_user_data_dir(Some("~/chrome-data"), false, &ProfileDirs::default());
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("chrome-data"));
    }

    #[test]
    fn test_dedicated_dir_when_not_reusing() {
        let dir = resolve_user_data_dir(None, false, &ProfileDirs::default());
        assert!(dir.ends_with(DEDICATED_PROFILE_SUBDIR));
    }
}
