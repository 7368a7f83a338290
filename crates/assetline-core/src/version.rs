use std::fmt::Write;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns a formatted version string including build metadata if available.
#[must_use]
pub fn version_string() -> String {
    let mut s = format!("assetline {VERSION}");

    if let Some(hash) = option_env!("ASSETLINE_BUILD_GIT_HASH") {
        let _ = write!(s, " ({hash})");
    }

    let _ = write!(
        s,
        " [pipeline schema {}]",
        crate::pipeline::PIPELINE_SCHEMA_VERSION
    );
    s
}
