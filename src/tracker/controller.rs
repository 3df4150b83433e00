use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{error, info, warn};
use tokio::{
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::{
    db::{Database, FocusSession},
    error::{TrackerError, TrackerResult},
    live::LiveSession,
    metrics::MetricsCollector,
    sampling::{MetricSynthesizer, SamplingController},
    settings::Settings,
};

use super::{
    state::{TrackerSnapshot, TrackerState, TrackerStatus},
    summary::summarize,
};

/// Receives the summary of each session that ran long enough to keep.
#[async_trait]
pub trait SummarySink: Send + Sync + 'static {
    async fn persist_summary(&self, summary: &FocusSession) -> TrackerResult<()>;
}

#[async_trait]
impl SummarySink for Database {
    async fn persist_summary(&self, summary: &FocusSession) -> TrackerResult<()> {
        self.insert_sessions(std::slice::from_ref(summary))
            .await
            .map(|_| ())
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub sample_interval: Duration,
    pub min_session_secs: u64,
    pub current_app: String,
    pub current_window: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for EngineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            sample_interval: settings.sample_interval(),
            min_session_secs: settings.min_session_secs,
            current_app: settings.current_app.clone(),
            current_window: settings.current_window.clone(),
        }
    }
}

type SynthesizerFactory = dyn Fn() -> MetricSynthesizer + Send + Sync;

/// Owns the session lifecycle and the background sampling loop.
///
/// Cloning is cheap and every clone drives the same engine, so the handle can
/// be passed to any number of readers.
#[derive(Clone)]
pub struct TrackingEngine {
    state: Arc<Mutex<TrackerState>>,
    sampler: Arc<Mutex<SamplingController>>,
    sink: Option<Arc<dyn SummarySink>>,
    metrics: MetricsCollector,
    synthesizer_factory: Arc<SynthesizerFactory>,
    config: Arc<EngineConfig>,
}

impl TrackingEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(TrackerState::default())),
            sampler: Arc::new(Mutex::new(SamplingController::new())),
            sink: None,
            metrics: MetricsCollector::new(),
            synthesizer_factory: Arc::new(MetricSynthesizer::with_entropy),
            config: Arc::new(config),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn SummarySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replaces the source of synthesizers; each session gets a fresh one.
    pub fn with_synthesizer<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> MetricSynthesizer + Send + Sync + 'static,
    {
        self.synthesizer_factory = Arc::new(factory);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn status(&self) -> TrackerStatus {
        self.state.lock().await.status()
    }

    pub async fn start(&self) -> TrackerResult<()> {
        let mut state = self.state.lock().await;
        if state.status() == TrackerStatus::Tracking {
            return Err(TrackerError::AlreadyTracking);
        }

        let live = Arc::new(Mutex::new(LiveSession::new(
            Utc::now(),
            Instant::now(),
            self.config.current_app.clone(),
            self.config.current_window.clone(),
        )));
        let session_id = live.lock().await.id().to_string();

        self.sampler
            .lock()
            .await
            .start_sampling(
                live.clone(),
                (self.synthesizer_factory)(),
                self.config.sample_interval,
            )
            .map_err(|err| {
                warn!("Refusing to start session {session_id}: {err}");
                TrackerError::AlreadyTracking
            })?;

        state.begin_session(live);
        info!("Started tracking session {session_id}");
        Ok(())
    }

    /// Ends the current session. Always leaves the engine `Idle`.
    ///
    /// Returns the summary when the session ran longer than the configured
    /// minimum; persistence failures are logged, not returned.
    pub async fn stop(&self) -> Option<FocusSession> {
        let live = {
            let mut state = self.state.lock().await;
            if state.status() == TrackerStatus::Idle {
                return None;
            }

            let live = state.finish();
            if let Err(err) = self.sampler.lock().await.stop_sampling().await {
                error!("Sampling loop did not shut down cleanly: {err:#}");
            }
            live?
        };

        let summary = {
            let session = live.lock().await;
            let duration = session.duration_seconds();
            if duration > self.config.min_session_secs {
                let usage = self.metrics.sample().await;
                let summary = summarize(&session, usage);
                info!(
                    "Session {} completed: {}s, Focus: {:.1}",
                    session.id(),
                    duration,
                    summary.focus_score
                );
                Some(summary)
            } else {
                info!(
                    "Session {} discarded: {}s does not exceed the {}s minimum",
                    session.id(),
                    duration,
                    self.config.min_session_secs
                );
                None
            }
        };

        if let (Some(summary), Some(sink)) = (summary.as_ref(), self.sink.as_ref()) {
            if let Err(err) = sink.persist_summary(summary).await {
                error!("Failed to persist session summary: {err}");
            }
        }

        info!("Stopped tracking session");
        summary
    }

    pub async fn snapshot(&self) -> TrackerSnapshot {
        let state = self.state.lock().await;
        match state.live() {
            Some(live) => TrackerSnapshot::Tracking(live.lock().await.snapshot()),
            None => TrackerSnapshot::Idle,
        }
    }
}
