//! Lifecycle-managed access to the fallback translation model.
//!
//! [`TranslatorGateway`] owns the only [`TranslatorSession`] in the process.
//!
//! ```text
//! Unloaded ──translate()──▶ Loading ──load ok──▶ Loaded
//!    ▲                        │                    │
//!    └────── load error ──────┘                    │
//!    └──────────── idle timeout / unload() ────────┘
//! ```
//!
//! - The session sits behind a `tokio::sync::Mutex`.  A caller that arrives
//!   while a load is in flight waits on the mutex and then finds the model
//!   loaded; only one load ever runs at a time.
//! - Acquisition runs as its own task, so a caller that is cancelled
//!   mid-load does not abandon the load: the model still lands in the
//!   session for the next caller.
//! - Loading arms the idle timer and every successful translation re-arms
//!   it.  When it fires the session is cleared under the same mutex and the
//!   model is released before the mutex is handed to the next caller.
//! - Loading, decoding and releasing run on the blocking pool.
//! - The model is shared through [`ModelHandle`]; accelerator memory is
//!   released when the last handle drops, so an inference that is still
//!   running when the timer fires finishes on a live model.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::{DecodeOptions, TranslatorConfig};
use crate::translate::backend::{ModelLoader, TranslateError, TranslationModel};
use crate::translate::cleanup::clean_translation;

/// Idle window after which a loaded model is evicted.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async text translation, as consumed by the lookup service.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// TranslatorStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorStatus {
    Unloaded,
    Loading,
    Loaded,
}

impl TranslatorStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => TranslatorStatus::Loading,
            2 => TranslatorStatus::Loaded,
            _ => TranslatorStatus::Unloaded,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            TranslatorStatus::Unloaded => 0,
            TranslatorStatus::Loading => 1,
            TranslatorStatus::Loaded => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// ModelHandle
// ---------------------------------------------------------------------------

/// Owning wrapper that calls [`TranslationModel::release`] exactly once.
///
/// Backends may block while releasing (an HTTP call, a device sync), so a
/// handle dropped on a runtime worker hands the release to the blocking pool.
pub struct ModelHandle {
    model: Option<Box<dyn TranslationModel>>,
}

impl ModelHandle {
    fn new(model: Box<dyn TranslationModel>) -> Self {
        Self { model: Some(model) }
    }

    fn translate(&self, text: &str, options: &DecodeOptions) -> Result<Vec<String>, TranslateError> {
        match &self.model {
            Some(model) => model.translate(text, options),
            None => Err(TranslateError::Unavailable("model already released".into())),
        }
    }

    /// Release on the calling thread.  Only call from the blocking pool.
    fn release_now(mut self) {
        if let Some(model) = self.model.take() {
            release(model);
        }
    }
}

fn release(model: Box<dyn TranslationModel>) {
    model.release();
    log::debug!("translator: model released");
}

impl Drop for ModelHandle {
    fn drop(&mut self) {
        let Some(model) = self.model.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => drop(runtime.spawn_blocking(move || release(model))),
            Err(_) => release(model),
        }
    }
}

// ---------------------------------------------------------------------------
// TranslatorSession
// ---------------------------------------------------------------------------

/// The currently resident model, if any.
#[derive(Default)]
struct TranslatorSession {
    model: Option<Arc<ModelHandle>>,
    last_used: Option<Instant>,
    idle_timer: Option<JoinHandle<()>>,
    /// Bumped on every timer re-arm; a timer only evicts its own generation.
    generation: u64,
}

struct Inner {
    loader: Arc<dyn ModelLoader>,
    session: Mutex<TranslatorSession>,
    status: AtomicU8,
    loads: AtomicU64,
    idle_timeout: Duration,
    decode: DecodeOptions,
}

impl Inner {
    fn set_status(&self, status: TranslatorStatus) {
        self.status.store(status.as_u8(), Ordering::SeqCst);
    }

    /// Return the resident model, loading it first if necessary.
    async fn acquire(self: &Arc<Self>) -> Result<Arc<ModelHandle>, TranslateError> {
        let mut session = self.session.lock().await;
        if let Some(model) = &session.model {
            return Ok(Arc::clone(model));
        }

        let model = self.load().await?;
        session.model = Some(Arc::clone(&model));
        session.last_used = Some(Instant::now());
        self.arm_idle_timer(&mut session);
        Ok(model)
    }

    /// Run the loader on the blocking pool.  Caller holds the session lock.
    async fn load(&self) -> Result<Arc<ModelHandle>, TranslateError> {
        self.set_status(TranslatorStatus::Loading);
        log::info!("translator: loading model");
        let started = Instant::now();

        // Wrapped on the worker so a model that nobody collects is still
        // released.
        let loader = Arc::clone(&self.loader);
        let loaded = tokio::task::spawn_blocking(move || {
            loader.load().map(|model| Arc::new(ModelHandle::new(model)))
        })
        .await
        .map_err(|e| TranslateError::Worker(e.to_string()))
        .and_then(|r| r);

        match loaded {
            Ok(model) => {
                self.loads.fetch_add(1, Ordering::SeqCst);
                self.set_status(TranslatorStatus::Loaded);
                log::info!("translator: model loaded in {:?}", started.elapsed());
                Ok(model)
            }
            Err(e) => {
                self.set_status(TranslatorStatus::Unloaded);
                log::warn!("translator: load failed: {e}");
                Err(match e {
                    TranslateError::Unavailable(_) => e,
                    other => TranslateError::Unavailable(other.to_string()),
                })
            }
        }
    }

    /// Record a successful translation on `model` and re-arm the idle timer,
    /// unless the model was evicted in the meantime.
    async fn touch(self: &Arc<Self>, model: &Arc<ModelHandle>) {
        let mut session = self.session.lock().await;
        let resident = session
            .model
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, model));
        if resident {
            session.last_used = Some(Instant::now());
            self.arm_idle_timer(&mut session);
        }
    }

    fn arm_idle_timer(self: &Arc<Self>, session: &mut TranslatorSession) {
        if let Some(timer) = session.idle_timer.take() {
            timer.abort();
        }
        session.generation += 1;

        let generation = session.generation;
        let idle = self.idle_timeout;
        let weak: Weak<Inner> = Arc::downgrade(self);

        session.idle_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(idle).await;
            if let Some(inner) = weak.upgrade() {
                inner.evict(Some(generation)).await;
            }
        }));
        log::debug!("translator: idle timer armed ({idle:?})");
    }

    /// Clear the session.  `generation` is `Some` when called from an idle
    /// timer, which must not evict a session that was re-armed after it.
    async fn evict(&self, generation: Option<u64>) {
        let mut session = self.session.lock().await;

        if let Some(g) = generation {
            if session.generation != g {
                return;
            }
            // This is the running timer itself; detach rather than abort.
            session.idle_timer.take();
        } else if let Some(timer) = session.idle_timer.take() {
            timer.abort();
        }

        session.last_used = None;
        let Some(model) = session.model.take() else {
            return;
        };
        self.set_status(TranslatorStatus::Unloaded);

        match generation {
            Some(_) => log::info!(
                "translator: idle for {:?}, unloading model",
                self.idle_timeout
            ),
            None => log::info!("translator: unloading model"),
        }

        match Arc::try_unwrap(model) {
            // Sole owner: release while still holding the session lock, so no
            // new load starts before the old model is gone.
            Ok(handle) => {
                if let Err(e) = tokio::task::spawn_blocking(move || handle.release_now()).await {
                    log::warn!("translator: release task failed: {e}");
                }
            }
            // An inference still holds the model; the last handle releases it.
            Err(_) => log::debug!("translator: model busy, release deferred to last user"),
        }
    }
}

// ---------------------------------------------------------------------------
// TranslatorGateway
// ---------------------------------------------------------------------------

/// Lazily loaded, idle-evicted fallback translator.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct TranslatorGateway {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TranslatorGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorGateway")
            .field("status", &self.status())
            .field("loads", &self.load_count())
            .field("idle_timeout", &self.inner.idle_timeout)
            .finish_non_exhaustive()
    }
}

impl TranslatorGateway {
    pub fn new(loader: Arc<dyn ModelLoader>, idle_timeout: Duration, decode: DecodeOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader,
                session: Mutex::new(TranslatorSession::default()),
                status: AtomicU8::new(TranslatorStatus::Unloaded.as_u8()),
                loads: AtomicU64::new(0),
                idle_timeout,
                decode,
            }),
        }
    }

    pub fn from_config(loader: Arc<dyn ModelLoader>, config: &TranslatorConfig) -> Self {
        Self::new(
            loader,
            Duration::from_secs(config.idle_unload_secs),
            config.decode.clone(),
        )
    }

    pub fn status(&self) -> TranslatorStatus {
        TranslatorStatus::from_u8(self.inner.status.load(Ordering::SeqCst))
    }

    /// Number of successful loads since construction.
    pub fn load_count(&self) -> u64 {
        self.inner.loads.load(Ordering::SeqCst)
    }

    /// When the resident model was loaded or last produced a translation.
    pub async fn last_used(&self) -> Option<Instant> {
        self.inner.session.lock().await.last_used
    }

    /// Evict the model now (no-op when nothing is loaded).
    pub async fn unload(&self) {
        self.inner.evict(None).await;
    }

    /// Translate `text` and clean the top hypothesis.
    ///
    /// # Errors
    ///
    /// - [`TranslateError::Unavailable`]: the model could not be loaded.
    /// - [`TranslateError::Inference`]: decoding failed (not retried).
    /// - [`TranslateError::EmptyOutput`]: no hypotheses.
    /// - [`TranslateError::Worker`]: a background task panicked.
    pub async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let model = self.acquire().await?;
        let source = text.to_string();
        let options = self.inner.decode.clone();

        let worker_model = Arc::clone(&model);
        let hypotheses =
            tokio::task::spawn_blocking(move || worker_model.translate(&source, &options))
                .await
                .map_err(|e| TranslateError::Worker(e.to_string()))??;

        let top = hypotheses.into_iter().next().ok_or(TranslateError::EmptyOutput)?;
        self.inner.touch(&model).await;
        Ok(clean_translation(&top))
    }

    async fn acquire(&self) -> Result<Arc<ModelHandle>, TranslateError> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.acquire().await })
            .await
            .map_err(|e| TranslateError::Worker(e.to_string()))?
    }
}

#[async_trait]
impl Translator for TranslatorGateway {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        TranslatorGateway::translate(self, text).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct Counters {
        loads: AtomicUsize,
        translations: AtomicUsize,
        releases: AtomicUsize,
        released_while_busy: AtomicUsize,
    }

    impl Counters {
        fn releases(&self) -> usize {
            self.releases.load(Ordering::SeqCst)
        }
    }

    struct FixedModel {
        output: Vec<String>,
        decode_delay: Duration,
        in_flight: AtomicUsize,
        counters: Arc<Counters>,
    }

    impl FixedModel {
        fn new(output: Vec<String>, decode_delay: Duration, counters: Arc<Counters>) -> Self {
            Self {
                output,
                decode_delay,
                in_flight: AtomicUsize::new(0),
                counters,
            }
        }
    }

    impl TranslationModel for FixedModel {
        fn translate(&self, _text: &str, _o: &DecodeOptions) -> Result<Vec<String>, TranslateError> {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.decode_delay);
            self.counters.translations.fetch_add(1, Ordering::SeqCst);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }

        fn release(&self) {
            if self.in_flight.load(Ordering::SeqCst) > 0 {
                self.counters.released_while_busy.fetch_add(1, Ordering::SeqCst);
            }
            self.counters.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FixedLoader {
        output: Vec<String>,
        load_delay: Duration,
        decode_delay: Duration,
        counters: Arc<Counters>,
    }

    impl FixedLoader {
        fn new(output: &[&str]) -> Self {
            Self {
                output: output.iter().map(|s| s.to_string()).collect(),
                load_delay: Duration::ZERO,
                decode_delay: Duration::ZERO,
                counters: Arc::new(Counters::default()),
            }
        }
    }

    impl ModelLoader for FixedLoader {
        fn load(&self) -> Result<Box<dyn TranslationModel>, TranslateError> {
            std::thread::sleep(self.load_delay);
            self.counters.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FixedModel::new(
                self.output.clone(),
                self.decode_delay,
                Arc::clone(&self.counters),
            )))
        }
    }

    /// Decodes fine once, then fails every call.
    struct FlakyModel {
        calls: AtomicUsize,
    }

    impl TranslationModel for FlakyModel {
        fn translate(&self, _: &str, _: &DecodeOptions) -> Result<Vec<String>, TranslateError> {
            match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(vec!["ok".into()]),
                _ => Err(TranslateError::Inference("decoder exploded".into())),
            }
        }
    }

    struct FlakyLoader;

    impl ModelLoader for FlakyLoader {
        fn load(&self) -> Result<Box<dyn TranslationModel>, TranslateError> {
            Ok(Box::new(FlakyModel {
                calls: AtomicUsize::new(0),
            }))
        }
    }

    struct BrokenLoader;

    impl ModelLoader for BrokenLoader {
        fn load(&self) -> Result<Box<dyn TranslationModel>, TranslateError> {
            Err(TranslateError::Unavailable("no CUDA device".into()))
        }
    }

    struct FailingModelLoader;

    impl ModelLoader for FailingModelLoader {
        fn load(&self) -> Result<Box<dyn TranslationModel>, TranslateError> {
            struct Failing;
            impl TranslationModel for Failing {
                fn translate(&self, _: &str, _: &DecodeOptions) -> Result<Vec<String>, TranslateError> {
                    Err(TranslateError::Inference("decoder exploded".into()))
                }
            }
            Ok(Box::new(Failing))
        }
    }

    fn gateway(loader: impl ModelLoader + 'static, idle: Duration) -> TranslatorGateway {
        TranslatorGateway::new(Arc::new(loader), idle, DecodeOptions::default())
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn starts_unloaded_and_loads_lazily() {
        let gw = gateway(FixedLoader::new(&["hello"]), DEFAULT_IDLE_TIMEOUT);
        assert_eq!(gw.status(), TranslatorStatus::Unloaded);
        assert_eq!(gw.load_count(), 0);

        assert_eq!(gw.translate("你好").await.unwrap(), "hello");
        assert_eq!(gw.status(), TranslatorStatus::Loaded);
        assert_eq!(gw.load_count(), 1);
        assert!(gw.last_used().await.is_some());
    }

    #[tokio::test]
    async fn uses_top_hypothesis_and_cleans_it() {
        let gw = gateway(
            FixedLoader::new(&["machine learning, and so on (ML).", "other"]),
            DEFAULT_IDLE_TIMEOUT,
        );
        assert_eq!(gw.translate("机器学习").await.unwrap(), "machine learning");
    }

    #[tokio::test]
    async fn reuses_loaded_model() {
        let loader = FixedLoader::new(&["x"]);
        let counters = Arc::clone(&loader.counters);
        let gw = gateway(loader, DEFAULT_IDLE_TIMEOUT);

        for _ in 0..3 {
            gw.translate("一").await.unwrap();
        }
        assert_eq!(counters.loads.load(Ordering::SeqCst), 1);
        assert_eq!(counters.translations.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_load() {
        let mut loader = FixedLoader::new(&["ok"]);
        loader.load_delay = Duration::from_millis(100);
        let counters = Arc::clone(&loader.counters);
        let gw = gateway(loader, DEFAULT_IDLE_TIMEOUT);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gw = gw.clone();
                tokio::spawn(async move { gw.translate("好").await })
            })
            .collect();
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap(), "ok");
        }

        assert_eq!(counters.loads.load(Ordering::SeqCst), 1);
        assert_eq!(gw.load_count(), 1);
    }

    #[tokio::test]
    async fn status_is_loading_while_load_in_flight() {
        let mut loader = FixedLoader::new(&["ok"]);
        loader.load_delay = Duration::from_millis(200);
        let gw = gateway(loader, DEFAULT_IDLE_TIMEOUT);

        let background = {
            let gw = gw.clone();
            tokio::spawn(async move { gw.translate("好").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gw.status(), TranslatorStatus::Loading);

        background.await.unwrap().unwrap();
        assert_eq!(gw.status(), TranslatorStatus::Loaded);
    }

    #[tokio::test]
    async fn idle_timeout_unloads_and_next_call_reloads() {
        let loader = FixedLoader::new(&["ok"]);
        let counters = Arc::clone(&loader.counters);
        let gw = gateway(loader, Duration::from_millis(50));

        gw.translate("好").await.unwrap();
        assert_eq!(gw.status(), TranslatorStatus::Loaded);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(gw.status(), TranslatorStatus::Unloaded);
        assert_eq!(counters.releases(), 1);
        assert!(gw.last_used().await.is_none());

        gw.translate("好").await.unwrap();
        assert_eq!(gw.status(), TranslatorStatus::Loaded);
        assert_eq!(gw.load_count(), 2);
        assert_eq!(counters.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn activity_rearms_idle_timer() {
        let gw = gateway(FixedLoader::new(&["ok"]), Duration::from_millis(200));

        for _ in 0..4 {
            gw.translate("好").await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        // 400 ms elapsed overall, never 200 ms idle.
        assert_eq!(gw.status(), TranslatorStatus::Loaded);
        assert_eq!(gw.load_count(), 1);
    }

    #[tokio::test]
    async fn explicit_unload_releases_model() {
        let loader = FixedLoader::new(&["ok"]);
        let counters = Arc::clone(&loader.counters);
        let gw = gateway(loader, DEFAULT_IDLE_TIMEOUT);

        gw.translate("好").await.unwrap();
        gw.unload().await;
        assert_eq!(gw.status(), TranslatorStatus::Unloaded);
        assert_eq!(counters.releases(), 1);

        // Unloading twice is harmless.
        gw.unload().await;
        assert_eq!(counters.releases(), 1);
    }

    #[tokio::test]
    async fn load_failure_surfaces_unavailable() {
        let gw = gateway(BrokenLoader, DEFAULT_IDLE_TIMEOUT);
        let err = gw.translate("好").await.unwrap_err();
        assert!(matches!(err, TranslateError::Unavailable(_)));
        assert_eq!(gw.status(), TranslatorStatus::Unloaded);
        assert_eq!(gw.load_count(), 0);
    }

    #[tokio::test]
    async fn inference_failure_is_not_retried() {
        let gw = gateway(FailingModelLoader, DEFAULT_IDLE_TIMEOUT);
        let err = gw.translate("好").await.unwrap_err();
        assert!(matches!(err, TranslateError::Inference(_)));
        // The model itself stays resident.
        assert_eq!(gw.status(), TranslatorStatus::Loaded);
    }

    #[tokio::test]
    async fn empty_hypotheses_is_an_error() {
        let gw = gateway(FixedLoader::new(&[]), DEFAULT_IDLE_TIMEOUT);
        let err = gw.translate("好").await.unwrap_err();
        assert!(matches!(err, TranslateError::EmptyOutput));
    }

    #[tokio::test]
    async fn cancelled_caller_does_not_abandon_load() {
        let mut loader = FixedLoader::new(&["ok"]);
        loader.load_delay = Duration::from_millis(200);
        let counters = Arc::clone(&loader.counters);
        let gw = gateway(loader, DEFAULT_IDLE_TIMEOUT);

        let caller = {
            let gw = gw.clone();
            tokio::spawn(async move { gw.translate("好").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gw.status(), TranslatorStatus::Loading);
        caller.abort();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(gw.status(), TranslatorStatus::Loaded);
        assert_eq!(gw.load_count(), 1);
        assert_eq!(counters.releases(), 0);

        // The next caller finds the model already resident.
        assert_eq!(gw.translate("好").await.unwrap(), "ok");
        assert_eq!(counters.loads.load(Ordering::SeqCst), 1);

        gw.unload().await;
        assert_eq!(counters.releases(), 1);
    }

    #[tokio::test]
    async fn dropping_a_loaded_gateway_releases_off_the_runtime() {
        let loader = FixedLoader::new(&["ok"]);
        let counters = Arc::clone(&loader.counters);
        let gw = gateway(loader, DEFAULT_IDLE_TIMEOUT);

        gw.translate("好").await.unwrap();
        drop(gw);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn dropping_outside_a_runtime_releases_inline() {
        let counters = Arc::new(Counters::default());
        let handle = ModelHandle::new(Box::new(FixedModel::new(
            vec!["ok".into()],
            Duration::ZERO,
            Arc::clone(&counters),
        )));
        drop(handle);
        assert_eq!(counters.releases(), 1);
    }

    #[tokio::test]
    async fn idle_eviction_waits_for_in_flight_inference() {
        let mut loader = FixedLoader::new(&["slow"]);
        loader.decode_delay = Duration::from_millis(300);
        let counters = Arc::clone(&loader.counters);
        let gw = gateway(loader, Duration::from_millis(50));

        let caller = {
            let gw = gw.clone();
            tokio::spawn(async move { gw.translate("好").await })
        };

        // The timer fires while the decode is still running.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(gw.status(), TranslatorStatus::Unloaded);
        assert_eq!(counters.releases(), 0);

        assert_eq!(caller.await.unwrap().unwrap(), "slow");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counters.releases(), 1);
        assert_eq!(counters.released_while_busy.load(Ordering::SeqCst), 0);

        // A finished call on an evicted model does not resurrect it.
        assert_eq!(gw.status(), TranslatorStatus::Unloaded);
        assert!(gw.last_used().await.is_none());

        assert_eq!(gw.translate("好").await.unwrap(), "slow");
        assert_eq!(gw.load_count(), 2);
        assert_eq!(gw.status(), TranslatorStatus::Loaded);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unload_racing_translations_leaves_consistent_state() {
        let mut loader = FixedLoader::new(&["ok"]);
        loader.load_delay = Duration::from_millis(10);
        loader.decode_delay = Duration::from_millis(20);
        let counters = Arc::clone(&loader.counters);
        let gw = gateway(loader, DEFAULT_IDLE_TIMEOUT);

        let callers: Vec<_> = (0..16)
            .map(|i| {
                let gw = gw.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(5 * i)).await;
                    gw.translate("好").await
                })
            })
            .collect();
        let unloader = {
            let gw = gw.clone();
            tokio::spawn(async move {
                for _ in 0..5 {
                    tokio::time::sleep(Duration::from_millis(15)).await;
                    gw.unload().await;
                }
            })
        };

        for c in callers {
            assert_eq!(c.await.unwrap().unwrap(), "ok");
        }
        unloader.await.unwrap();

        gw.unload().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(gw.status(), TranslatorStatus::Unloaded);
        let loads = counters.loads.load(Ordering::SeqCst);
        assert!(loads >= 1);
        assert_eq!(gw.load_count() as usize, loads);
        assert_eq!(counters.releases(), loads);
        assert_eq!(counters.released_while_busy.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_decode_does_not_rearm_idle_timer() {
        let gw = gateway(FlakyLoader, Duration::from_millis(150));

        gw.translate("好").await.unwrap();
        let first = gw.last_used().await.expect("loaded");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(gw.translate("好").await.is_err());
        assert_eq!(gw.last_used().await, Some(first));

        // 150 ms after the last success the model is gone, even though a
        // call was made 50 ms ago.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(gw.status(), TranslatorStatus::Unloaded);
    }

    #[test]
    fn gateway_is_object_safe_translator() {
        let gw = gateway(FixedLoader::new(&["ok"]), DEFAULT_IDLE_TIMEOUT);
        let _: Arc<dyn Translator> = Arc::new(gw);
    }
}
