//! Where settings and the lexicon live on disk, resolved with `dirs`.
//!
//! `settings.toml` goes under the per-user config root and the CC-CEDICT
//! text file under the per-user local data root, each in a `hanzi-lookup`
//! subdirectory.  On Linux that is `~/.config/hanzi-lookup/settings.toml`
//! and `~/.local/share/hanzi-lookup/cc-cedict.txt`.
//!
//! Nothing here creates directories; `AppConfig::save_to` creates the
//! settings directory on first save, and the lexicon is expected to be
//! installed by the user (or pointed at with `--dict`).

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    pub data_dir: PathBuf,
    /// Lexicon used when neither `settings.toml` nor `--dict` names one.
    pub dictionary_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "hanzi-lookup";
    const SETTINGS_FILE: &'static str = "settings.toml";
    const DICTIONARY_FILE: &'static str = "cc-cedict.txt";

    /// Platform roots, or the working directory when `dirs` has none.
    pub fn new() -> Self {
        let here = || PathBuf::from(".");
        Self::with_roots(
            dirs::config_dir().unwrap_or_else(here),
            dirs::data_local_dir().unwrap_or_else(here),
        )
    }

    /// Lay the files out under explicit roots.
    pub fn with_roots(config_root: impl AsRef<Path>, data_root: impl AsRef<Path>) -> Self {
        let config_dir = config_root.as_ref().join(Self::APP_NAME);
        let data_dir = data_root.as_ref().join(Self::APP_NAME);
        Self {
            settings_file: config_dir.join(Self::SETTINGS_FILE),
            dictionary_file: data_dir.join(Self::DICTIONARY_FILE),
            config_dir,
            data_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
