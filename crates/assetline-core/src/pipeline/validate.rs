//! Dry-run validation of an assembled (or deserialized) pipeline.

use super::assemble::{chunk_group_defects, rule_defects, template_defects};
use super::{codes, Pipeline, PIPELINE_SCHEMA_VERSION};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One invariant breach found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Violation {
    /// Stable code (see [`codes`]).
    pub code: String,
    /// The rule, category, plugin, or binding at fault.
    pub subject: String,
    pub message: String,
}

impl Violation {
    fn new(code: &str, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for Violation {
    fn from(err: ConfigError) -> Self {
        let subject = match &err {
            ConfigError::NoRules => "rules".to_string(),
            ConfigError::EmptyTransformChain { rule }
            | ConfigError::InvalidTransform { rule, .. }
            | ConfigError::InvalidPattern { rule, .. } => rule.clone(),
            ConfigError::InvalidOutputTemplate { category, .. }
            | ConfigError::AmbiguousOutputCategory { category, .. } => category.to_string(),
        };
        Self::new(err.code(), subject, err.to_string())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.subject, self.message)
    }
}

/// Re-check every pipeline invariant. Never fails; empty means valid.
#[must_use]
pub fn validate(pipeline: &Pipeline) -> BTreeSet<Violation> {
    let mut out = BTreeSet::new();

    if pipeline.schema_version != PIPELINE_SCHEMA_VERSION {
        out.insert(Violation::new(
            codes::PIPELINE_SCHEMA_MISMATCH,
            "pipeline",
            format!(
                "schema version {} is not {PIPELINE_SCHEMA_VERSION}",
                pipeline.schema_version
            ),
        ));
    }

    if pipeline.bindings.is_empty() {
        out.insert(Violation::new(
            codes::PIPELINE_NO_BINDINGS,
            "pipeline",
            "pipeline has no rule bindings",
        ));
    }

    let mut previous: Option<usize> = None;
    for binding in &pipeline.bindings {
        let label = binding.label();

        if previous.is_some_and(|p| p >= binding.index) {
            out.insert(Violation::new(
                codes::PIPELINE_BINDING_ORDER,
                label.clone(),
                format!("binding index {} is out of declaration order", binding.index),
            ));
        }
        previous = Some(binding.index);

        out.extend(rule_defects(binding.index, &binding.rule).into_iter().map(Violation::from));

        if binding.output.category != binding.rule.output {
            out.insert(Violation::new(
                codes::PIPELINE_CATEGORY_MISMATCH,
                label.clone(),
                format!(
                    "rule produces {} output but is bound to a {} template",
                    binding.rule.output, binding.output.category
                ),
            ));
        } else if pipeline
            .template(binding.output.category)
            .is_some_and(|t| *t != binding.output)
        {
            out.insert(Violation::new(
                codes::PIPELINE_UNBOUND_TEMPLATE,
                label,
                format!(
                    "bound template `{}` is not the pipeline's {} template",
                    binding.output.pattern, binding.output.category
                ),
            ));
        }
    }

    out.extend(
        template_defects(
            &pipeline.templates,
            pipeline.bindings.iter().map(|b| b.rule.output),
        )
        .into_iter()
        .map(Violation::from),
    );

    for plugin in &pipeline.plugins {
        if !plugin.applies(pipeline.mode) {
            out.insert(Violation::new(
                codes::PIPELINE_PLUGIN_MODE_MISMATCH,
                plugin.name.clone(),
                format!("plugin does not apply in {} mode", pipeline.mode),
            ));
        }
    }

    out.extend(
        chunk_group_defects(&pipeline.chunk_groups)
            .into_iter()
            .map(Violation::from),
    );

    out
}
