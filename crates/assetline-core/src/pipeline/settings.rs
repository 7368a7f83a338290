//! Mode-independent build settings carried through assembly unchanged.

use super::pattern::MatchPattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default dev server port.
pub const DEFAULT_DEV_PORT: u16 = 3000;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Which chunks a split group draws modules from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkScope {
    #[default]
    All,
    Async,
    Initial,
}

/// A chunk-splitting group, e.g. moving `node_modules` into `vendors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkGroup {
    pub name: String,
    #[serde(rename = "match")]
    pub test: MatchPattern,
    #[serde(default)]
    pub chunks: ChunkScope,
}

impl ChunkGroup {
    /// Identifier used in diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        format!("chunks.{}", self.name)
    }
}

/// Module resolution hints for the bundling engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ResolveSettings {
    /// Extensions tried in order for extensionless imports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    /// Import prefix -> directory.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alias: BTreeMap<String, String>,
}

/// Dev server settings. Consumed only when the engine serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub hot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_base: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_DEV_PORT
}

impl Default for DevServerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_DEV_PORT,
            hot: false,
            content_base: None,
        }
    }
}

pub(crate) fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}
