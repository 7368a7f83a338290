//! Output naming templates.
//!
//! ## Placeholders
//!
//! | Placeholder | Expands to | Categories |
//! |---|---|---|
//! | `[name]` | input file stem (required) | all |
//! | `[id]` | chunk id (the file stem) | script, style |
//! | `[ext]` | input extension, without the dot | asset |
//! | `[hash]`, `[contenthash]` | BLAKE3 hex of the content | all |
//!
//! Hash placeholders take an optional length, as in `[contenthash:4]`.

use super::rule::OutputCategory;
use crate::error::ConfigError;
use assetline_util::hash::{content_digest, short_digest};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hash length used when neither the template nor the caller picks one.
pub const DEFAULT_HASH_LEN: usize = 8;

/// Naming pattern for one category of build output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputTemplate {
    pub category: OutputCategory,
    pub pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Name,
    Id,
    Ext,
    Hash(Option<usize>),
}

impl Placeholder {
    fn allowed_in(self, category: OutputCategory) -> bool {
        match self {
            Self::Name | Self::Hash(_) => true,
            Self::Id => category != OutputCategory::Asset,
            Self::Ext => category == OutputCategory::Asset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str, Placeholder),
}

impl OutputTemplate {
    #[must_use]
    pub fn new(category: OutputCategory, pattern: impl Into<String>) -> Self {
        Self {
            category,
            pattern: pattern.into(),
        }
    }

    /// Check placeholders against this template's category.
    ///
    /// # Errors
    /// `ConfigError::InvalidOutputTemplate` naming the first problem found.
    pub fn check(&self) -> Result<(), ConfigError> {
        let segments = parse(&self.pattern).map_err(|reason| self.invalid(reason))?;

        let mut has_name = false;
        for segment in &segments {
            if let Segment::Placeholder(raw, ph) = segment {
                if !ph.allowed_in(self.category) {
                    return Err(self.invalid(format!(
                        "placeholder `[{raw}]` is not valid for {} output",
                        self.category
                    )));
                }
                has_name |= *ph == Placeholder::Name;
            }
        }

        if has_name {
            Ok(())
        } else {
            Err(self.invalid("missing required `[name]` placeholder".to_string()))
        }
    }

    /// Render the output path for one input file.
    ///
    /// `default_hash_len` applies to hash placeholders without an explicit
    /// length; lengths are clamped to `1..=64`.
    ///
    /// # Errors
    /// Fails if the template does not pass [`OutputTemplate::check`].
    pub fn render(
        &self,
        input: &Path,
        content: &[u8],
        default_hash_len: usize,
    ) -> Result<String, ConfigError> {
        self.check()?;
        let segments = parse(&self.pattern).map_err(|reason| self.invalid(reason))?;

        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let ext = input.extension().and_then(|s| s.to_str()).unwrap_or("");
        let needs_hash = segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(_, Placeholder::Hash(_))));
        let digest = if needs_hash {
            content_digest(content)
        } else {
            String::new()
        };

        let mut out = String::with_capacity(self.pattern.len() + 16);
        for segment in &segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(_, Placeholder::Name | Placeholder::Id) => out.push_str(stem),
                Segment::Placeholder(_, Placeholder::Ext) => out.push_str(ext),
                Segment::Placeholder(_, Placeholder::Hash(len)) => {
                    out.push_str(short_digest(&digest, len.unwrap_or(default_hash_len)));
                }
            }
        }
        Ok(out)
    }

    fn invalid(&self, reason: String) -> ConfigError {
        ConfigError::InvalidOutputTemplate {
            category: self.category,
            pattern: self.pattern.clone(),
            reason,
        }
    }
}

fn parse(pattern: &str) -> Result<Vec<Segment<'_>>, String> {
    if pattern.trim().is_empty() {
        return Err("pattern is empty".to_string());
    }

    let mut segments = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find('[') {
        if open > 0 {
            segments.push(Segment::Literal(&rest[..open]));
        }
        let after = &rest[open + 1..];
        let close = after
            .find(']')
            .ok_or_else(|| format!("unterminated placeholder at `{}`", &rest[open..]))?;
        let raw = &after[..close];
        segments.push(Segment::Placeholder(raw, parse_placeholder(raw)?));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    Ok(segments)
}

fn parse_placeholder(raw: &str) -> Result<Placeholder, String> {
    let (key, len) = match raw.split_once(':') {
        Some((key, len)) => (key, Some(len)),
        None => (raw, None),
    };

    let placeholder = match key {
        "name" => Placeholder::Name,
        "id" => Placeholder::Id,
        "ext" => Placeholder::Ext,
        "hash" | "contenthash" => {
            let len = match len {
                None => None,
                Some(text) => match text.parse::<usize>() {
                    Ok(0) | Err(_) => return Err(format!("invalid hash length in `[{raw}]`")),
                    Ok(n) => Some(n),
                },
            };
            return Ok(Placeholder::Hash(len));
        }
        _ => return Err(format!("unknown placeholder `[{raw}]`")),
    };

    if len.is_some() {
        return Err(format!("placeholder `[{key}]` does not take a length"));
    }
    Ok(placeholder)
}
