use clap::Parser;
use std::path::PathBuf;

/// Flags override the configuration file, which overrides built-in defaults.
/// Everything is read once at startup; nothing is reloaded mid-run.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatarc")]
#[command(about = "Export conversations from a browser-based chat service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output file for the export document (default: chat_export.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// TOML configuration file; a missing file means defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint to attach to (default: http://localhost:9515)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Root URL of the chat service (default: https://chat.openai.com/)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Use a dedicated browser profile instead of reusing the real one
    #[arg(long)]
    pub fresh_profile: bool,

    /// Explicit browser user-data directory (overrides the per-OS default)
    #[arg(long)]
    pub profile_dir: Option<String>,

    /// Profile name inside the user-data directory (default: Default)
    #[arg(long)]
    pub profile_name: Option<String>,

    /// Conversations requested per listing page (default: 50)
    #[arg(long)]
    pub page_size: Option<u64>,
}
