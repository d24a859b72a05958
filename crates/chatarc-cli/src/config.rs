use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use chatarc_browser::ProfileDirs;
use chatarc_harvest::{LIST_PAGE_SIZE, SelectorOverrides, Selectors};

use crate::args::Cli;

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
const DEFAULT_BASE_URL: &str = "https://chat.openai.com/";
const DEFAULT_PROFILE_NAME: &str = "Default";
const DEFAULT_OUTPUT: &str = "chat_export.json";

/// Raw on-disk configuration. Every field is optional; absent sections fall
/// back to built-in defaults, and a missing file yields an empty config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub browser: BrowserSection,
    pub export: ExportSection,
    pub selectors: SelectorOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrowserSection {
    pub webdriver_url: Option<String>,
    pub base_url: Option<String>,
    /// true: reuse the real browser profile to inherit the authenticated
    /// session; false: use a dedicated profile directory.
    pub use_real_profile: Option<bool>,
    pub profile_dir: Option<String>,
    pub profile_name: Option<String>,
    pub page_size: Option<u64>,
    /// Per-OS real-profile directories, for layouts the built-in defaults
    /// don't cover (portable installs, Chromium forks).
    pub profile_dirs: ProfileDirsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileDirsSection {
    pub macos: Option<String>,
    pub windows: Option<String>,
    pub linux: Option<String>,
}

impl ProfileDirsSection {
    fn into_profile_dirs(self) -> ProfileDirs {
        ProfileDirs {
            macos: self.macos,
            windows: self.windows,
            linux: self.linux,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub output: Option<PathBuf>,
    /// Source tag recorded in the export document; derived from the service
    /// host when unset.
    pub source: Option<String>,
}

impl FileConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

/// Fully resolved run configuration, fixed for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub webdriver_url: String,
    pub base_url: Url,
    pub use_real_profile: bool,
    pub profile_dir: Option<String>,
    pub profile_dirs: ProfileDirs,
    pub profile_name: String,
    pub page_size: u64,
    pub output: PathBuf,
    pub source_tag: String,
    pub selectors: Selectors,
}

impl ExportConfig {
    /// Merge flags over the config file over defaults.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::default(),
        };

        let base_url_raw = cli
            .base_url
            .clone()
            .or(file.browser.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url_raw)
            .with_context(|| format!("invalid base URL: {}", base_url_raw))?;

        let use_real_profile = if cli.fresh_profile {
            false
        } else {
            file.browser.use_real_profile.unwrap_or(true)
        };

        let source_tag = file.export.source.unwrap_or_else(|| {
            format!(
                "{} (API-first exporter)",
                base_url.host_str().unwrap_or("chat")
            )
        });

        let mut selectors = Selectors::default();
        selectors.apply(&file.selectors);

        Ok(Self {
            webdriver_url: cli
                .webdriver_url
                .clone()
                .or(file.browser.webdriver_url)
                .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            base_url,
            use_real_profile,
            profile_dir: cli.profile_dir.clone().or(file.browser.profile_dir),
            profile_dirs: file.browser.profile_dirs.into_profile_dirs(),
            profile_name: cli
                .profile_name
                .clone()
                .or(file.browser.profile_name)
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
            page_size: cli
                .page_size
                .or(file.browser.page_size)
                .unwrap_or(LIST_PAGE_SIZE),
            output: cli
                .output
                .clone()
                .or(file.export.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            source_tag,
            selectors,
        })
    }
}
