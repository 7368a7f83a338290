//! Build modes and mode-scoped plugin declarations.
//!
//! Plugins are not switched on by branching on the environment. Each
//! declaration carries the set of modes it applies in, and assembly filters
//! on that set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Build environment selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Development, Self::Production];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "invalid mode '{other}'. Use: development or production"
            )),
        }
    }
}

/// A named extension with mode-scoped applicability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginSpec {
    pub name: String,
    /// Modes in which this plugin is active. Empty means never.
    pub applies_in: BTreeSet<Mode>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl PluginSpec {
    /// A plugin active in every mode.
    #[must_use]
    pub fn always(name: impl Into<String>) -> Self {
        Self::new(name, Mode::ALL)
    }

    #[must_use]
    pub fn new(name: impl Into<String>, modes: impl IntoIterator<Item = Mode>) -> Self {
        Self {
            name: name.into(),
            applies_in: modes.into_iter().collect(),
            options: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn applies(&self, mode: Mode) -> bool {
        self.applies_in.contains(&mode)
    }
}

/// Plugins active in `mode`, in declaration order.
#[must_use]
pub fn select_plugins(plugins: &[PluginSpec], mode: Mode) -> Vec<PluginSpec> {
    plugins.iter().filter(|p| p.applies(mode)).cloned().collect()
}
