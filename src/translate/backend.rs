//! Translation backend traits and the HTTP model-server implementation.
//!
//! # Overview
//!
//! [`ModelLoader`] produces a [`TranslationModel`]; the gateway calls it at
//! most once per residency period and drops the model on idle eviction.
//! Both traits are synchronous: the gateway runs every call on tokio's
//! blocking pool.
//!
//! [`HttpModelLoader`] is the production implementation.  It targets a small
//! model server that hosts a CTranslate2 OPUS-MT zh→en model on the GPU:
//!
//! | Method | Path         | Purpose                                   |
//! |--------|--------------|-------------------------------------------|
//! | GET    | `/health`    | readiness check, run on every load        |
//! | POST   | `/translate` | decode one source text into hypotheses    |
//! | POST   | `/unload`    | release accelerator memory                |

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DecodeOptions, TranslatorConfig};

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors surfaced by the translation subsystem.
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    /// The backend could not be loaded (missing weights, accelerator or
    /// server unavailable, disabled by configuration).
    #[error("translation unavailable: {0}")]
    Unavailable(String),

    /// A loaded backend failed while decoding.
    #[error("translation failed: {0}")]
    Inference(String),

    /// The backend returned no hypotheses.
    #[error("translation produced no output")]
    EmptyOutput,

    /// The blocking worker panicked or was cancelled.
    #[error("translation worker failed: {0}")]
    Worker(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        TranslateError::Inference(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A loaded translation model.
///
/// `translate` returns hypotheses best-first; callers use only the first.
pub trait TranslationModel: Send + Sync {
    fn translate(&self, text: &str, options: &DecodeOptions) -> Result<Vec<String>, TranslateError>;

    /// Free accelerator memory.  Called exactly once, when the last handle to
    /// the model is dropped.
    fn release(&self) {}
}

/// Loads a [`TranslationModel`].  May block for seconds.
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<Box<dyn TranslationModel>, TranslateError>;
}

// Compile-time assertion: both traits must stay object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TranslationModel>, _: Arc<dyn ModelLoader>) {}
};

// ---------------------------------------------------------------------------
// DisabledLoader
// ---------------------------------------------------------------------------

/// Loader used when `translator.enabled = false`; every load fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLoader;

impl ModelLoader for DisabledLoader {
    fn load(&self) -> Result<Box<dyn TranslationModel>, TranslateError> {
        Err(TranslateError::Unavailable("translator disabled".into()))
    }
}

// ---------------------------------------------------------------------------
// HTTP model server
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    beam_size: u32,
    max_decoding_length: u32,
    length_penalty: f32,
    repetition_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    hypotheses: Vec<String>,
}

/// Loads an [`HttpTranslationModel`] after checking the server's health
/// endpoint.
///
/// All connection details come from [`TranslatorConfig`].
#[derive(Debug, Clone)]
pub struct HttpModelLoader {
    base_url: String,
    timeout: Duration,
}

impl HttpModelLoader {
    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl ModelLoader for HttpModelLoader {
    fn load(&self) -> Result<Box<dyn TranslationModel>, TranslateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TranslateError::Unavailable(e.to_string()))?;

        let url = format!("{}/health", self.base_url);
        client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| TranslateError::Unavailable(format!("{url}: {e}")))?;

        log::info!("Translation model server ready at {}", self.base_url);
        Ok(Box::new(HttpTranslationModel {
            client,
            base_url: self.base_url.clone(),
        }))
    }
}

/// A model resident on a remote model server.
pub struct HttpTranslationModel {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl std::fmt::Debug for HttpTranslationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTranslationModel")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TranslationModel for HttpTranslationModel {
    fn translate(&self, text: &str, options: &DecodeOptions) -> Result<Vec<String>, TranslateError> {
        let body = TranslateRequest {
            text,
            beam_size: options.beam_size,
            max_decoding_length: options.max_decoding_length,
            length_penalty: options.length_penalty,
            repetition_penalty: options.repetition_penalty,
        };

        let response: TranslateResponse = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        Ok(response.hypotheses)
    }

    fn release(&self) {
        let url = format!("{}/unload", self.base_url);
        if let Err(e) = self.client.post(&url).send() {
            log::warn!("failed to release translation model at {url}: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
