//! Match patterns for rules, excludes, and chunk groups.
//!
//! A pattern is written either as a glob (`*.ts`, `src/**/*.{png,svg}`) or as
//! a slash-delimited regular expression (`/\.(woff2?|ttf)$/i`).
//!
//! Text is a regex exactly when it starts with `/` and ends with `/` or
//! `/i`. Anything else is a glob, so `/dist/ms` is an absolute glob. A
//! slash-wrapped path like `/src/lib/` is the regex `src/lib`, searched
//! anywhere in the path; write `/src/lib/**` for the glob.
//!
//! Globs without a `/` are matched against the file name. Globs with a `/`
//! are matched against the path and every component-aligned suffix of it,
//! so `node_modules/**` matches `/repo/node_modules/x/index.js`. Regexes are
//! searched anywhere in the path. Paths are normalized to forward slashes
//! before matching.

use glob::{MatchOptions, Pattern};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A pattern as declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchPattern(String);

impl MatchPattern {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// The pattern text exactly as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this pattern is written as a regex literal.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        split_regex_literal(&self.0).is_some()
    }

    /// Compile into a matcher.
    ///
    /// # Errors
    /// Returns a human-readable reason when the pattern is malformed.
    pub fn compile(&self) -> Result<Matcher, String> {
        if self.0.trim().is_empty() {
            return Err("pattern is empty".to_string());
        }

        if let Some((body, flags)) = split_regex_literal(&self.0) {
            if body.is_empty() {
                return Err("regex body is empty".to_string());
            }
            let source = if flags == "i" {
                format!("(?i){body}")
            } else {
                body.to_string()
            };
            return Regex::new(&source)
                .map(Matcher::Regex)
                .map_err(|e| e.to_string());
        }

        let alternatives = expand_braces(&self.0)?;
        let mut patterns = Vec::with_capacity(alternatives.len());
        for alt in &alternatives {
            patterns.push(Pattern::new(alt).map_err(|e| e.to_string())?);
        }
        Ok(Matcher::Glob {
            patterns,
            path_scoped: self.0.contains('/'),
        })
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchPattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A compiled pattern.
#[derive(Debug, Clone)]
pub enum Matcher {
    Glob {
        /// One pattern per brace alternative.
        patterns: Vec<Pattern>,
        /// Whether the glob contains a `/` and so applies to paths.
        path_scoped: bool,
    },
    Regex(Regex),
}

impl Matcher {
    /// Test a file path.
    #[must_use]
    pub fn is_match(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        match self {
            Self::Regex(re) => re.is_match(&normalized),
            Self::Glob {
                patterns,
                path_scoped: false,
            } => {
                let name = normalized.rsplit('/').next().unwrap_or(&normalized);
                patterns.iter().any(|p| p.matches_with(name, GLOB_OPTIONS))
            }
            Self::Glob {
                patterns,
                path_scoped: true,
            } => suffixes(&normalized)
                .any(|candidate| patterns.iter().any(|p| p.matches_with(candidate, GLOB_OPTIONS))),
        }
    }
}

/// Split `/body/` or `/body/i` into body and flags.
fn split_regex_literal(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    if flags.is_empty() || flags == "i" {
        Some((body, flags))
    } else {
        None
    }
}

/// The path itself, then each suffix that starts after a `/`.
fn suffixes(path: &str) -> impl Iterator<Item = &str> {
    std::iter::once(path).chain(
        path.match_indices('/')
            .map(move |(i, _)| &path[i + 1..])
            .filter(|s| !s.is_empty()),
    )
}

/// Expand `{a,b}` groups into separate globs. Groups do not nest.
fn expand_braces(source: &str) -> Result<Vec<String>, String> {
    let Some(open) = source.find('{') else {
        if source.contains('}') {
            return Err("unbalanced `}` in glob".to_string());
        }
        return Ok(vec![source.to_string()]);
    };
    let close = source[open..]
        .find('}')
        .map(|i| open + i)
        .ok_or_else(|| "unbalanced `{` in glob".to_string())?;

    let inner = &source[open + 1..close];
    if inner.contains('{') {
        return Err("nested `{` groups are not supported".to_string());
    }

    let (head, tail) = (&source[..open], &source[close + 1..]);
    let mut out = Vec::new();
    for tail_alt in expand_braces(tail)? {
        for choice in inner.split(',') {
            out.push(format!("{head}{choice}{tail_alt}"));
        }
    }
    Ok(out)
}
