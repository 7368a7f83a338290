//! The pipeline assembler.
//!
//! Assembly is a single pure pass. Checks run in a fixed order (rules,
//! templates, categories, chunk groups) so the reported error for a given
//! config is always the same one.

use super::plugin::select_plugins;
use super::rule::{OutputCategory, Rule};
use super::settings::ChunkGroup;
use super::template::OutputTemplate;
use super::{Mode, Pipeline, PipelineConfig, RuleBinding, PIPELINE_SCHEMA_VERSION};
use crate::error::ConfigError;
use std::collections::BTreeMap;

/// Assemble `config` for `mode` into a [`Pipeline`].
///
/// # Errors
/// The first [`ConfigError`] found. No partial pipeline is returned.
pub fn assemble(config: &PipelineConfig, mode: Mode) -> Result<Pipeline, ConfigError> {
    if config.rules.is_empty() {
        return Err(ConfigError::NoRules);
    }

    for (index, rule) in config.rules.iter().enumerate() {
        first(rule_defects(index, rule))?;
    }
    first(template_defects(
        &config.output_templates,
        config.rules.iter().map(|r| r.output),
    ))?;
    first(chunk_group_defects(&config.chunk_groups))?;

    let by_category = templates_by_category(&config.output_templates);
    let mut bindings = Vec::with_capacity(config.rules.len());
    for (index, rule) in config.rules.iter().enumerate() {
        // Exactly one template per used category was checked above.
        let output = by_category
            .get(&rule.output)
            .and_then(|ts| ts.first())
            .copied()
            .cloned()
            .ok_or(ConfigError::AmbiguousOutputCategory {
                category: rule.output,
                count: 0,
            })?;
        bindings.push(RuleBinding {
            index,
            rule: rule.clone(),
            output,
        });
    }

    let mut templates = config.output_templates.clone();
    templates.sort();

    Ok(Pipeline {
        schema_version: PIPELINE_SCHEMA_VERSION,
        mode,
        notes: shadowed_rule_notes(&config.rules),
        bindings,
        templates,
        plugins: select_plugins(&config.plugins, mode),
        entries: config.entries.clone(),
        resolve: config.resolve.clone(),
        chunk_groups: config.chunk_groups.clone(),
        dev_server: config.dev_server.clone(),
        output_dir: config.output_dir.clone(),
    })
}

fn first(defects: Vec<ConfigError>) -> Result<(), ConfigError> {
    match defects.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every defect of one rule, in check order.
pub(super) fn rule_defects(index: usize, rule: &Rule) -> Vec<ConfigError> {
    let label = rule.label(index);
    let mut defects = Vec::new();

    if rule.transforms.is_empty() {
        defects.push(ConfigError::EmptyTransformChain {
            rule: label.clone(),
        });
    }
    for (t, transform) in rule.transforms.iter().enumerate() {
        if transform.name.trim().is_empty() {
            defects.push(ConfigError::InvalidTransform {
                rule: label.clone(),
                index: t,
            });
        }
    }

    for pattern in std::iter::once(&rule.test).chain(&rule.exclude) {
        if let Err(reason) = pattern.compile() {
            defects.push(ConfigError::InvalidPattern {
                rule: label.clone(),
                pattern: pattern.to_string(),
                reason,
            });
        }
    }

    defects
}

/// Template shape errors, then category cardinality errors.
///
/// A category with several templates is always ambiguous. A category with
/// none is only an error when one of `needed` uses it.
pub(super) fn template_defects(
    templates: &[OutputTemplate],
    needed: impl IntoIterator<Item = OutputCategory>,
) -> Vec<ConfigError> {
    let mut defects: Vec<ConfigError> = templates.iter().filter_map(|t| t.check().err()).collect();

    let by_category = templates_by_category(templates);
    for (category, found) in &by_category {
        if found.len() > 1 {
            defects.push(ConfigError::AmbiguousOutputCategory {
                category: *category,
                count: found.len(),
            });
        }
    }

    let mut reported = Vec::new();
    for category in needed {
        if !by_category.contains_key(&category) && !reported.contains(&category) {
            reported.push(category);
            defects.push(ConfigError::AmbiguousOutputCategory { category, count: 0 });
        }
    }

    defects
}

pub(super) fn chunk_group_defects(groups: &[ChunkGroup]) -> Vec<ConfigError> {
    groups
        .iter()
        .filter_map(|group| {
            group.test.compile().err().map(|reason| ConfigError::InvalidPattern {
                rule: group.label(),
                pattern: group.test.to_string(),
                reason,
            })
        })
        .collect()
}

fn templates_by_category(
    templates: &[OutputTemplate],
) -> BTreeMap<OutputCategory, Vec<&OutputTemplate>> {
    let mut map: BTreeMap<OutputCategory, Vec<&OutputTemplate>> = BTreeMap::new();
    for template in templates {
        map.entry(template.category).or_default().push(template);
    }
    map
}

/// A later rule selecting exactly the same files as an earlier one is
/// unreachable under first-match dispatch.
fn shadowed_rule_notes(rules: &[Rule]) -> Vec<String> {
    let mut notes = Vec::new();
    for (later, rule) in rules.iter().enumerate() {
        if let Some(earlier) = rules[..later].iter().position(|r| r.same_selection(rule)) {
            notes.push(format!(
                "rule `{}` is unreachable: `{}` matches the same files first",
                rule.label(later),
                rules[earlier].label(earlier)
            ));
        }
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{validate, ChunkScope, PluginSpec, Transform};

    fn ts_rule() -> Rule {
        Rule::new("*.ts", OutputCategory::Script)
            .transform(Transform::new("typecheck"))
            .transform(Transform::new("transpile"))
    }

    fn script_template() -> OutputTemplate {
        OutputTemplate::new(OutputCategory::Script, "scripts/[name].[hash].js")
    }

    /// Shaped after a typical single-page-app bundler setup.
    fn full_config() -> PipelineConfig {
        let mut config = PipelineConfig::new(
            vec![
                Rule::new("*.js", OutputCategory::Script)
                    .exclude("node_modules/**")
                    .transform(Transform::new("babel-loader")),
                Rule::new(r"/\.(gif|png|jpe?g|svg)$/i", OutputCategory::Asset)
                    .id("images")
                    .transform(Transform::new("file-loader")),
                Rule::new("*.scss", OutputCategory::Style)
                    .id("scss")
                    .transform(Transform::new("css-extract"))
                    .transform(Transform::new("css-loader"))
                    .transform(Transform::new("resolve-url-loader").option("root", "src"))
                    .transform(Transform::new("sass-loader")),
                Rule::new("*.ts", OutputCategory::Script)
                    .id("ts")
                    .exclude("node_modules/**")
                    .transform(Transform::new("ng-annotate-loader"))
                    .transform(Transform::new("ts-loader").option("transpileOnly", true)),
            ],
            vec![
                OutputTemplate::new(OutputCategory::Style, "styles/[name].[contenthash:4].css"),
                OutputTemplate::new(OutputCategory::Script, "scripts/[name].bundle.[hash:4].js"),
                OutputTemplate::new(OutputCategory::Asset, "assets/images/[name].[ext]"),
            ],
            vec![
                PluginSpec::always("html").option("template", "src/index.html"),
                PluginSpec::always("css-extract"),
                PluginSpec::new("module-replacement", [Mode::Production]),
                PluginSpec::new("uglify", [Mode::Production]).option("sourceMap", true),
                PluginSpec::new("named-modules", [Mode::Development]),
                PluginSpec::new("hot-module-replacement", [Mode::Development]),
                PluginSpec::new("source-map", [Mode::Development]),
            ],
        );
        config.entries.insert("app".into(), "src/index.ts".into());
        config.chunk_groups.push(ChunkGroup {
            name: "vendors".into(),
            test: "node_modules/**".into(),
            chunks: ChunkScope::All,
        });
        config.dev_server.hot = true;
        config
    }

    #[test]
    fn test_single_ts_rule_in_production() {
        let config = PipelineConfig::new(
            vec![ts_rule()],
            vec![script_template()],
            vec![PluginSpec::new("hot-module-replacement", [Mode::Development])],
        );

        let pipeline = assemble(&config, Mode::Production).unwrap();
        assert_eq!(pipeline.bindings.len(), 1);
        assert_eq!(pipeline.bindings[0].output, script_template());
        assert_eq!(pipeline.templates, vec![script_template()]);
        assert!(pipeline.plugins.is_empty());
        assert_eq!(pipeline.mode, Mode::Production);
        assert!(pipeline.notes.is_empty());
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let config = full_config();
        for mode in Mode::ALL {
            let a = assemble(&config, mode).unwrap();
            let b = assemble(&config, mode).unwrap();
            assert_eq!(a, b);
            assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }

    #[test]
    fn test_assembled_pipelines_validate_clean() {
        let config = full_config();
        for mode in Mode::ALL {
            let pipeline = assemble(&config, mode).unwrap();
            assert!(validate(&pipeline).is_empty(), "mode {mode}");
        }
    }

    #[test]
    fn test_mode_changes_only_plugins() {
        let config = full_config();
        let dev = assemble(&config, Mode::Development).unwrap();
        let prod = assemble(&config, Mode::Production).unwrap();

        assert_eq!(dev.bindings, prod.bindings);
        assert_eq!(dev.templates, prod.templates);
        assert_eq!(dev.chunk_groups, prod.chunk_groups);
        assert_eq!(dev.dev_server, prod.dev_server);
        assert_ne!(dev.plugins, prod.plugins);

        let names = |p: &Pipeline| p.plugins.iter().map(|p| p.name.clone()).collect::<Vec<_>>();
        assert_eq!(
            names(&dev),
            ["html", "css-extract", "named-modules", "hot-module-replacement", "source-map"]
        );
        assert_eq!(
            names(&prod),
            ["html", "css-extract", "module-replacement", "uglify"]
        );
    }

    #[test]
    fn test_bindings_preserve_declaration_order() {
        let pipeline = assemble(&full_config(), Mode::Development).unwrap();
        let indices: Vec<_> = pipeline.bindings.iter().map(|b| b.index).collect();
        assert_eq!(indices, [0, 1, 2, 3]);
        assert_eq!(pipeline.bindings[2].rule.transforms.len(), 4);
        assert_eq!(pipeline.bindings[2].output.category, OutputCategory::Style);
    }

    #[test]
    fn test_templates_sorted_by_category() {
        let pipeline = assemble(&full_config(), Mode::Production).unwrap();
        let categories: Vec<_> = pipeline.templates.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            [OutputCategory::Script, OutputCategory::Style, OutputCategory::Asset]
        );
    }

    #[test]
    fn test_no_rules() {
        let config = PipelineConfig::new(vec![], vec![script_template()], vec![]);
        assert_eq!(assemble(&config, Mode::Development), Err(ConfigError::NoRules));
    }

    #[test]
    fn test_duplicate_style_templates_are_ambiguous() {
        let config = PipelineConfig::new(
            vec![ts_rule()],
            vec![
                script_template(),
                OutputTemplate::new(OutputCategory::Style, "a/[name].css"),
                OutputTemplate::new(OutputCategory::Style, "b/[name].css"),
            ],
            vec![],
        );
        assert_eq!(
            assemble(&config, Mode::Production),
            Err(ConfigError::AmbiguousOutputCategory {
                category: OutputCategory::Style,
                count: 2,
            })
        );
    }

    #[test]
    fn test_missing_template_for_used_category() {
        let config = PipelineConfig::new(
            vec![ts_rule()],
            vec![OutputTemplate::new(OutputCategory::Asset, "[name].[ext]")],
            vec![],
        );
        assert_eq!(
            assemble(&config, Mode::Production),
            Err(ConfigError::AmbiguousOutputCategory {
                category: OutputCategory::Script,
                count: 0,
            })
        );
    }

    #[test]
    fn test_unused_category_may_be_absent() {
        let config = PipelineConfig::new(vec![ts_rule()], vec![script_template()], vec![]);
        assert!(assemble(&config, Mode::Development).is_ok());
    }

    #[test]
    fn test_empty_transform_chain() {
        let config = PipelineConfig::new(
            vec![ts_rule(), Rule::new("*.css", OutputCategory::Script).id("css")],
            vec![script_template()],
            vec![],
        );
        assert_eq!(
            assemble(&config, Mode::Development),
            Err(ConfigError::EmptyTransformChain {
                rule: "css".to_string()
            })
        );
    }

    #[test]
    fn test_unnamed_transform() {
        let config = PipelineConfig::new(
            vec![ts_rule().transform(Transform::new(" "))],
            vec![script_template()],
            vec![],
        );
        assert_eq!(
            assemble(&config, Mode::Development),
            Err(ConfigError::InvalidTransform {
                rule: "rule[0]".to_string(),
                index: 2,
            })
        );
    }

    #[test]
    fn test_invalid_match_and_exclude_patterns() {
        let config = PipelineConfig::new(
            vec![Rule::new("[ts", OutputCategory::Script).transform(Transform::new("tsc"))],
            vec![script_template()],
            vec![],
        );
        let err = assemble(&config, Mode::Development).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern { ref rule, ref pattern, .. }
                if rule == "rule[0]" && pattern == "[ts"
        ));

        let config = PipelineConfig::new(
            vec![ts_rule().exclude("/(node_modules/")],
            vec![script_template()],
            vec![],
        );
        assert!(matches!(
            assemble(&config, Mode::Development),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_chunk_group_pattern() {
        let mut config = PipelineConfig::new(vec![ts_rule()], vec![script_template()], vec![]);
        config.chunk_groups.push(ChunkGroup {
            name: "vendors".into(),
            test: "node_modules/[".into(),
            chunks: ChunkScope::All,
        });
        let err = assemble(&config, Mode::Development).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern { ref rule, .. } if rule == "chunks.vendors"
        ));
    }

    #[test]
    fn test_invalid_template_reported_before_cardinality() {
        let config = PipelineConfig::new(
            vec![ts_rule()],
            vec![
                OutputTemplate::new(OutputCategory::Script, "scripts/[name].[ext]"),
                OutputTemplate::new(OutputCategory::Script, "other/[name].js"),
            ],
            vec![],
        );
        assert!(matches!(
            assemble(&config, Mode::Development),
            Err(ConfigError::InvalidOutputTemplate { .. })
        ));
    }

    #[test]
    fn test_rule_errors_reported_in_declaration_order() {
        let config = PipelineConfig::new(
            vec![
                Rule::new("*.css", OutputCategory::Style).id("first"),
                Rule::new("[", OutputCategory::Script).id("second"),
            ],
            vec![],
            vec![],
        );
        assert_eq!(
            assemble(&config, Mode::Development),
            Err(ConfigError::EmptyTransformChain {
                rule: "first".to_string()
            })
        );
    }

    #[test]
    fn test_shadowed_rule_is_noted() {
        let config = PipelineConfig::new(
            vec![
                ts_rule().id("ts"),
                Rule::new("*.ts", OutputCategory::Script)
                    .id("ts-again")
                    .transform(Transform::new("tsc")),
            ],
            vec![script_template()],
            vec![],
        );
        let pipeline = assemble(&config, Mode::Development).unwrap();
        assert_eq!(pipeline.bindings.len(), 2);
        assert_eq!(pipeline.notes.len(), 1);
        assert!(pipeline.notes[0].contains("ts-again"));
        assert!(validate(&pipeline).is_empty());
    }
}
