#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for assetline.
//!
//! Pure helpers with no logging dependency; the CLI crate owns tracing.

pub mod fs;
pub mod hash;

pub use hash::{content_digest, short_digest};
