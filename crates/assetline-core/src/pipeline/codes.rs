//! Stable error and violation codes.
//!
//! All codes are SCREAMING_SNAKE_CASE and stable across versions.

/// Configuration declares no rules.
pub const CONFIG_NO_RULES: &str = "CONFIG_NO_RULES";

/// A rule's transform chain is empty.
pub const CONFIG_EMPTY_TRANSFORM_CHAIN: &str = "CONFIG_EMPTY_TRANSFORM_CHAIN";

/// A transform entry has no name.
pub const CONFIG_INVALID_TRANSFORM: &str = "CONFIG_INVALID_TRANSFORM";

/// A match, exclude, or chunk-group pattern failed to compile.
pub const CONFIG_INVALID_PATTERN: &str = "CONFIG_INVALID_PATTERN";

/// An output template has missing or disallowed placeholders.
pub const CONFIG_INVALID_OUTPUT_TEMPLATE: &str = "CONFIG_INVALID_OUTPUT_TEMPLATE";

/// An output category has zero (when needed) or several templates.
pub const CONFIG_AMBIGUOUS_OUTPUT_CATEGORY: &str = "CONFIG_AMBIGUOUS_OUTPUT_CATEGORY";

/// No config file was found.
pub const CONFIG_NOT_FOUND: &str = "CONFIG_NOT_FOUND";

/// Config file could not be read.
pub const CONFIG_READ_ERROR: &str = "CONFIG_READ_ERROR";

/// Config file is not valid JSON/TOML for the expected shape.
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";

/// Generic I/O failure.
pub const IO_ERROR: &str = "IO_ERROR";

/// Pipeline has no rule bindings.
pub const PIPELINE_NO_BINDINGS: &str = "PIPELINE_NO_BINDINGS";

/// Binding indices are not strictly increasing.
pub const PIPELINE_BINDING_ORDER: &str = "PIPELINE_BINDING_ORDER";

/// Binding's template category differs from its rule's category.
pub const PIPELINE_CATEGORY_MISMATCH: &str = "PIPELINE_CATEGORY_MISMATCH";

/// Binding's template is not the pipeline's template for that category.
pub const PIPELINE_UNBOUND_TEMPLATE: &str = "PIPELINE_UNBOUND_TEMPLATE";

/// A plugin in the pipeline does not apply in the pipeline's mode.
pub const PIPELINE_PLUGIN_MODE_MISMATCH: &str = "PIPELINE_PLUGIN_MODE_MISMATCH";

/// Pipeline was produced by a different schema version.
pub const PIPELINE_SCHEMA_MISMATCH: &str = "PIPELINE_SCHEMA_MISMATCH";
