//! Fallback machine translation for headwords missing from the lexicon.
//!
//! This module provides:
//! * [`TranslatorGateway`]: lazy-loading, idle-evicting owner of the model.
//! * [`Translator`]: async trait the lookup service depends on.
//! * [`ModelLoader`] / [`TranslationModel`]: backend seam.
//! * [`HttpModelLoader`]: model-server backend; [`DisabledLoader`] when
//!   translation is switched off.
//! * [`clean_translation`]: deterministic output cleanup.
//! * [`TranslateError`]: error variants.

pub mod backend;
pub mod cleanup;
pub mod gateway;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{
    DisabledLoader, HttpModelLoader, HttpTranslationModel, ModelLoader, TranslateError,
    TranslationModel,
};
pub use cleanup::clean_translation;
pub use gateway::{ModelHandle, Translator, TranslatorGateway, TranslatorStatus, DEFAULT_IDLE_TIMEOUT};
