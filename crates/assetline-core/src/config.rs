use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for the assetline CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory config discovery starts from.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs and JSON command output.
    pub json: bool,

    /// Verbosity level (0 = WARN, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config rooted at the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}
