//! Pipeline assembly.
//!
//! A [`PipelineConfig`] (rules, output templates, plugins, and build
//! settings) is assembled for one [`Mode`] into an immutable [`Pipeline`]:
//! rule bindings in declaration order, the templates, the plugins active
//! in that mode, and the build settings passed through unchanged.
//!
//! ## Schema Version
//!
//! - Schema version 1: initial pipeline format

mod assemble;
pub mod codes;
mod pattern;
mod plugin;
mod rule;
mod settings;
mod template;
mod validate;

pub use assemble::assemble;
pub use pattern::{MatchPattern, Matcher};
pub use plugin::{select_plugins, Mode, PluginSpec};
pub use rule::{OutputCategory, Rule, Transform};
pub use settings::{
    ChunkGroup, ChunkScope, DevServerSettings, ResolveSettings, DEFAULT_DEV_PORT,
    DEFAULT_OUTPUT_DIR,
};
pub use template::{OutputTemplate, DEFAULT_HASH_LEN};
pub use validate::{validate, Violation};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Schema version for the serialized Pipeline format.
pub const PIPELINE_SCHEMA_VERSION: u32 = 1;

/// Declarative input to [`assemble`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Rules in declaration order.
    pub rules: Vec<Rule>,
    /// One template per output category.
    #[serde(default, alias = "output")]
    pub output_templates: Vec<OutputTemplate>,
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,
    /// Entry name -> source path.
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    #[serde(default)]
    pub resolve: ResolveSettings,
    #[serde(default)]
    pub chunk_groups: Vec<ChunkGroup>,
    #[serde(default)]
    pub dev_server: DevServerSettings,
    #[serde(default = "settings::default_output_dir")]
    pub output_dir: String,
}

impl PipelineConfig {
    #[must_use]
    pub fn new(
        rules: Vec<Rule>,
        output_templates: Vec<OutputTemplate>,
        plugins: Vec<PluginSpec>,
    ) -> Self {
        Self {
            rules,
            output_templates,
            plugins,
            entries: BTreeMap::new(),
            resolve: ResolveSettings::default(),
            chunk_groups: Vec::new(),
            dev_server: DevServerSettings::default(),
            output_dir: settings::default_output_dir(),
        }
    }
}

/// A rule resolved against its output template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBinding {
    /// Position of the rule in the declared rule list.
    pub index: usize,
    pub rule: Rule,
    pub output: OutputTemplate,
}

impl RuleBinding {
    /// Diagnostic identifier of the bound rule.
    #[must_use]
    pub fn label(&self) -> String {
        self.rule.label(self.index)
    }
}

/// The fully resolved output of assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub schema_version: u32,
    pub mode: Mode,
    /// Bindings in rule declaration order.
    pub bindings: Vec<RuleBinding>,
    /// Templates sorted by category.
    pub templates: Vec<OutputTemplate>,
    /// Plugins active in `mode`, in declaration order.
    pub plugins: Vec<PluginSpec>,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    #[serde(default)]
    pub resolve: ResolveSettings,
    #[serde(default)]
    pub chunk_groups: Vec<ChunkGroup>,
    #[serde(default)]
    pub dev_server: DevServerSettings,
    #[serde(default = "settings::default_output_dir")]
    pub output_dir: String,
    /// Notes (always present, may be empty).
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Pipeline {
    /// The template for a category, if exactly one is declared.
    #[must_use]
    pub fn template(&self, category: OutputCategory) -> Option<&OutputTemplate> {
        let mut found = self.templates.iter().filter(|t| t.category == category);
        match (found.next(), found.next()) {
            (Some(t), None) => Some(t),
            _ => None,
        }
    }

    /// Compile the bindings' patterns for first-match dispatch.
    ///
    /// # Errors
    /// `ConfigError::InvalidPattern` if a pattern does not compile, which
    /// can only happen for pipelines that were not produced by [`assemble`].
    pub fn dispatcher(&self) -> Result<Dispatcher<'_>, ConfigError> {
        let mut entries = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            let compile = |pattern: &MatchPattern| {
                pattern.compile().map_err(|reason| ConfigError::InvalidPattern {
                    rule: binding.label(),
                    pattern: pattern.to_string(),
                    reason,
                })
            };
            let test = compile(&binding.rule.test)?;
            let exclude = binding
                .rule
                .exclude
                .iter()
                .map(compile)
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(DispatchEntry {
                binding,
                test,
                exclude,
            });
        }
        Ok(Dispatcher { entries })
    }
}

struct DispatchEntry<'p> {
    binding: &'p RuleBinding,
    test: Matcher,
    exclude: Vec<Matcher>,
}

/// First-match-wins lookup over a pipeline's bindings.
pub struct Dispatcher<'p> {
    entries: Vec<DispatchEntry<'p>>,
}

impl<'p> Dispatcher<'p> {
    /// The first binding whose pattern matches `path` and whose excludes
    /// do not.
    #[must_use]
    pub fn dispatch(&self, path: &Path) -> Option<&'p RuleBinding> {
        self.entries
            .iter()
            .find(|e| e.test.is_match(path) && !e.exclude.iter().any(|x| x.is_match(path)))
            .map(|e| e.binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pipeline() -> Pipeline {
        let config = PipelineConfig::new(
            vec![
                Rule::new("*.js", OutputCategory::Script)
                    .id("babel")
                    .exclude("node_modules/**")
                    .transform(Transform::new("babel-loader")),
                Rule::new(r"/\.(gif|png|jpe?g|svg)$/i", OutputCategory::Asset)
                    .transform(Transform::new("file-loader")),
                Rule::new("*.{js,mjs}", OutputCategory::Script)
                    .id("vendor-js")
                    .transform(Transform::new("source-map-loader")),
            ],
            vec![
                OutputTemplate::new(OutputCategory::Script, "scripts/[name].[hash:4].js"),
                OutputTemplate::new(OutputCategory::Asset, "assets/images/[name].[ext]"),
            ],
            vec![],
        );
        assemble(&config, Mode::Development).unwrap()
    }

    #[test]
    fn test_schema_version_is_stable() {
        assert_eq!(PIPELINE_SCHEMA_VERSION, 1);
    }

    #[test]
    fn test_dispatch_first_match_wins() {
        let pipeline = sample_pipeline();
        let dispatcher = pipeline.dispatcher().unwrap();

        let hit = dispatcher.dispatch(Path::new("src/app.js")).unwrap();
        assert_eq!(hit.label(), "babel");
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_dispatch_exclude_falls_through_to_later_rule() {
        let pipeline = sample_pipeline();
        let dispatcher = pipeline.dispatcher().unwrap();

        let hit = dispatcher
            .dispatch(Path::new("node_modules/lodash/index.js"))
            .unwrap();
        assert_eq!(hit.label(), "vendor-js");
    }

    #[test]
    fn test_dispatch_regex_and_unmatched() {
        let pipeline = sample_pipeline();
        let dispatcher = pipeline.dispatcher().unwrap();

        let hit = dispatcher.dispatch(Path::new("img/Logo.PNG")).unwrap();
        assert_eq!(hit.label(), "rule[1]");
        assert_eq!(hit.output.category, OutputCategory::Asset);

        assert!(dispatcher.dispatch(Path::new("README.md")).is_none());
    }

    #[test]
    fn test_template_lookup() {
        let pipeline = sample_pipeline();
        assert!(pipeline.template(OutputCategory::Script).is_some());
        assert!(pipeline.template(OutputCategory::Style).is_none());
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let json = r#"{"rules": [], "modules": []}"#;
        assert!(serde_json::from_str::<PipelineConfig>(json).is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"rules": []}"#).unwrap();
        assert_eq!(config.output_dir, "dist");
        assert!(config.output_templates.is_empty());
        assert_eq!(config.dev_server.port, DEFAULT_DEV_PORT);
    }
}
