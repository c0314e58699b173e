//! Configuration module for the hanzi lookup service.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the lexicon and
//! the fallback translator, `AppPaths` for cross-platform data directories,
//! and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, DecodeOptions, DictionaryConfig, TranslatorConfig};
