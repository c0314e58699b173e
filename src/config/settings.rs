//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Missing keys fall back to their defaults, so a partial `settings.toml`
//! is valid.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// DictionaryConfig
// ---------------------------------------------------------------------------

/// Settings for the lexicon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Path to the CC-CEDICT text file.
    pub path: PathBuf,
    /// Maximum headwords returned by an English → Chinese lookup.
    pub reverse_max_results: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: AppPaths::new().dictionary_file,
            reverse_max_results: 6,
        }
    }
}

// ---------------------------------------------------------------------------
// DecodeOptions
// ---------------------------------------------------------------------------

/// Decoding parameters passed to the translation backend on every call.
///
/// Defaults favour short, dictionary-style glosses: greedy search, a hard
/// output cap and a strong repetition penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub beam_size: u32,
    /// Maximum output length in tokens.
    pub max_decoding_length: u32,
    /// Values below 1.0 favour shorter output.
    pub length_penalty: f32,
    pub repetition_penalty: f32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            beam_size: 1,
            max_decoding_length: 12,
            length_penalty: 0.6,
            repetition_penalty: 2.5,
        }
    }
}

// ---------------------------------------------------------------------------
// TranslatorConfig
// ---------------------------------------------------------------------------

/// Settings for the fallback machine translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// When `false`, unknown phrases are returned with an "unavailable"
    /// definition and no backend is ever contacted.
    pub enabled: bool,
    /// Base URL of the model server.
    pub base_url: String,
    /// Maximum seconds to wait for a single request to the model server.
    pub timeout_secs: u64,
    /// Seconds of inactivity after which the model is unloaded.
    pub idle_unload_secs: u64,
    pub decode: DecodeOptions,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8765".into(),
            timeout_secs: 30,
            idle_unload_secs: 300,
            decode: DecodeOptions::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Top-level application configuration.
///
/// # Persistence
///
/// ```rust,no_run
/// use hanzi_lookup::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Lexicon settings.
    pub dictionary: DictionaryConfig,
    /// Fallback translator settings.
    pub translator: TranslatorConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
