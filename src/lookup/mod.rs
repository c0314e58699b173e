//! Query resolution on top of the lexicon and the fallback translator.
//!
//! This module provides:
//! * [`LookupService`]: lexicon lookup with machine-translation fallback.
//! * [`LookupResult`]: tagged outcome of a lookup.
//! * [`contains_han`] / [`is_han`] / [`romanize`]: script helpers.

pub mod script;
pub mod service;

pub use script::{contains_han, is_han, romanize};
pub use service::{LookupResult, LookupService};
