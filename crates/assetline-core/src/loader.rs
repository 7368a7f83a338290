//! Pipeline config file discovery and parsing.
//!
//! Looks for `assetline.config.json`, then `assetline.config.toml`, in the
//! project root. An explicit path overrides discovery. The format is chosen
//! by extension: `.toml` is TOML, anything else is JSON.
//!
//! ```json
//! {
//!   "rules": [
//!     { "match": "*.ts", "output": "script", "exclude": ["node_modules/**"],
//!       "transforms": ["ng-annotate-loader", { "name": "ts-loader", "options": { "transpileOnly": true } }] }
//!   ],
//!   "output_templates": [ { "category": "script", "pattern": "scripts/[name].bundle.[hash:4].js" } ],
//!   "plugins": [ { "name": "hot-module-replacement", "applies_in": ["development"] } ]
//! }
//! ```

use crate::error::Error;
use crate::pipeline::PipelineConfig;
use assetline_util::fs::read_lossy;
use std::path::{Path, PathBuf};

/// Config file names in priority order.
pub const CONFIG_FILES: &[&str] = &["assetline.config.json", "assetline.config.toml"];

/// Find a config file in the given root directory.
#[must_use]
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Load the pipeline config.
///
/// `explicit` is resolved against `root` when relative. Without it, the
/// first of [`CONFIG_FILES`] present in `root` is used.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<(PathBuf, PipelineConfig), Error> {
    let path = match explicit {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => root.join(p),
        None => find_config_file(root).ok_or_else(|| Error::ConfigNotFound {
            root: root.to_path_buf(),
            looked_for: CONFIG_FILES.join(", "),
        })?,
    };

    let source = read_lossy(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    let config = parse_config(&path, &source)?;
    Ok((path, config))
}

/// Parse config text, picking the format from `path`'s extension.
pub fn parse_config(path: &Path, source: &str) -> Result<PipelineConfig, Error> {
    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
    let parsed = if is_toml {
        toml::from_str(source).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(source).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| Error::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}
