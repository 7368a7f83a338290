//! Rules: an input pattern bound to an ordered transform chain.

use super::pattern::MatchPattern;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of build output a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputCategory {
    Script,
    Style,
    #[default]
    Asset,
}

impl OutputCategory {
    pub const ALL: [Self; 3] = [Self::Script, Self::Style, Self::Asset];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
            Self::Asset => "asset",
        }
    }
}

impl fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a transform chain, e.g. a loader with its options.
///
/// In config files a transform may be a bare name (`"css-loader"`) or an
/// object (`{"name": "ts-loader", "options": {...}}`). Options are opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TransformDecl")]
pub struct Transform {
    pub name: String,
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl Transform {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: serde_json::Map::new(),
        }
    }

    /// Set one option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged, deny_unknown_fields)]
enum TransformDecl {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        options: serde_json::Map<String, serde_json::Value>,
    },
}

impl From<TransformDecl> for Transform {
    fn from(decl: TransformDecl) -> Self {
        match decl {
            TransformDecl::Name(name) => Self::new(name),
            TransformDecl::Full { name, options } => Self { name, options },
        }
    }
}

/// Declarative binding of an input pattern to a transform chain.
///
/// Rule order is significant: consumers dispatch each file to the first
/// rule that matches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Optional stable identifier used in diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "match")]
    pub test: MatchPattern,
    /// Paths matching any of these are never handled by this rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<MatchPattern>,
    #[serde(default)]
    pub output: OutputCategory,
    pub transforms: Vec<Transform>,
}

impl Rule {
    #[must_use]
    pub fn new(test: impl Into<MatchPattern>, output: OutputCategory) -> Self {
        Self {
            id: None,
            test: test.into(),
            exclude: Vec::new(),
            output,
            transforms: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<MatchPattern>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Identifier for diagnostics: the declared id, or `rule[<index>]`.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("rule[{index}]"),
        }
    }

    /// Two rules with the same match and exclude sets see the same files.
    #[must_use]
    pub fn same_selection(&self, other: &Self) -> bool {
        self.test == other.test && self.exclude == other.exclude
    }
}
