use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::errors::{Result, RollcallError};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "rollcall.toml";

/// Top-level Rollcall configuration read from `rollcall.toml`.
///
/// Every section is optional; a missing file means "all defaults", so the
/// tool runs against the public API with nothing but a token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub rollcall: RollcallSection,
    #[serde(default)]
    pub crawl: CrawlSection,
    #[serde(default)]
    pub report: ReportSection,
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// An explicitly requested path must exist; the default
    /// `rollcall.toml` may be absent, in which case built-in defaults
    /// apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(RollcallError::InvalidConfig {
                        detail: format!("{} not found.", path.display()),
                    });
                }
                Self::parse_file(path)
            }
            None => {
                let default_path = Path::new(CONFIG_FILE);
                if default_path.exists() {
                    Self::parse_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| RollcallError::InvalidConfig {
            detail: format!("Failed to parse {}: {e}", path.display()),
        })?;

        if config.rollcall.api_base.trim().is_empty() {
            return Err(RollcallError::InvalidConfig {
                detail: "rollcall.api_base must not be empty".into(),
            });
        }
        if config.report.path.trim().is_empty() {
            return Err(RollcallError::InvalidConfig {
                detail: "report.path must not be empty".into(),
            });
        }

        Ok(config)
    }

    /// Pause between consecutive history page fetches.
    pub fn politeness(&self) -> Duration {
        Duration::from_millis(self.crawl.politeness_ms)
    }

    /// Per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl.request_timeout_secs)
    }
}

/// The `[rollcall]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RollcallSection {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Environment variable consulted for the bot token when no
    /// `--token` flag is given.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for RollcallSection {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
        }
    }
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_token_env() -> String {
    "DISCORD_TOKEN".to_string()
}

/// The `[crawl]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSection {
    #[serde(default = "default_politeness_ms")]
    pub politeness_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            politeness_ms: default_politeness_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_politeness_ms() -> u64 {
    200
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// The `[report]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_report_path")]
    pub path: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            path: default_report_path(),
        }
    }
}

fn default_report_path() -> String {
    "last-seen.csv".to_string()
}
