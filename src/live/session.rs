use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

use super::buffer::SlidingWindowBuffer;
use crate::sampling::MetricSample;

pub const SCORE_WINDOW_CAPACITY: usize = 300;
pub const ACTIVITY_WINDOW_CAPACITY: usize = 60;

/// A coarse burst of simulated input recorded by the sampling loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub timestamp: DateTime<Utc>,
    pub typing_events: u32,
    pub mouse_events: u32,
}

/// In-memory state of the one active tracking session.
///
/// Only the sampling loop mutates it. The three score-side buffers are always
/// appended together in [`LiveSession::record_sample`], so they stay index-aligned.
#[derive(Debug)]
pub struct LiveSession {
    id: String,
    started_at: DateTime<Utc>,
    /// Monotonic anchor for elapsed time; `started_at` is only for display and persistence.
    anchor: Instant,
    current_app: String,
    current_window: String,
    duration_seconds: u64,
    focus_scores: SlidingWindowBuffer<f64>,
    productivity_scores: SlidingWindowBuffer<f64>,
    timestamps: SlidingWindowBuffer<DateTime<Utc>>,
    activity_events: SlidingWindowBuffer<ActivityEvent>,
    typing_events: u64,
    mouse_events: u64,
}

impl LiveSession {
    pub fn new(
        started_at: DateTime<Utc>,
        anchor: Instant,
        current_app: impl Into<String>,
        current_window: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at,
            anchor,
            current_app: current_app.into(),
            current_window: current_window.into(),
            duration_seconds: 0,
            focus_scores: SlidingWindowBuffer::new(SCORE_WINDOW_CAPACITY),
            productivity_scores: SlidingWindowBuffer::new(SCORE_WINDOW_CAPACITY),
            timestamps: SlidingWindowBuffer::new(SCORE_WINDOW_CAPACITY),
            activity_events: SlidingWindowBuffer::new(ACTIVITY_WINDOW_CAPACITY),
            typing_events: 0,
            mouse_events: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn anchor(&self) -> Instant {
        self.anchor
    }

    pub fn current_app(&self) -> &str {
        &self.current_app
    }

    pub fn current_window(&self) -> &str {
        &self.current_window
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn typing_events(&self) -> u64 {
        self.typing_events
    }

    pub fn mouse_events(&self) -> u64 {
        self.mouse_events
    }

    pub fn focus_scores(&self) -> &SlidingWindowBuffer<f64> {
        &self.focus_scores
    }

    pub fn productivity_scores(&self) -> &SlidingWindowBuffer<f64> {
        &self.productivity_scores
    }

    pub fn sample_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Appends one sample to all three aligned buffers and advances the duration.
    pub fn record_sample(&mut self, at: DateTime<Utc>, elapsed_secs: f64, sample: MetricSample) {
        self.focus_scores.append(sample.focus);
        self.productivity_scores.append(sample.productivity);
        self.timestamps.append(at);

        // Duration never moves backwards even if a late tick reports a smaller elapsed.
        let whole_secs = elapsed_secs.max(0.0).floor() as u64;
        self.duration_seconds = self.duration_seconds.max(whole_secs);
    }

    pub fn record_activity(&mut self, event: ActivityEvent) {
        self.typing_events += u64::from(event.typing_events);
        self.mouse_events += u64::from(event.mouse_events);
        self.activity_events.append(event);
    }

    pub fn snapshot(&self) -> LiveSessionSnapshot {
        LiveSessionSnapshot {
            id: self.id.clone(),
            started_at: self.started_at,
            current_app: self.current_app.clone(),
            current_window: self.current_window.clone(),
            duration_seconds: self.duration_seconds,
            focus_scores: self.focus_scores.snapshot(),
            productivity_scores: self.productivity_scores.snapshot(),
            timestamps: self.timestamps.snapshot(),
            activity_events: self.activity_events.snapshot(),
            typing_events: self.typing_events,
            mouse_events: self.mouse_events,
        }
    }
}

/// Point-in-time copy of a [`LiveSession`] handed to readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSessionSnapshot {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub current_app: String,
    pub current_window: String,
    pub duration_seconds: u64,
    pub focus_scores: Vec<f64>,
    pub productivity_scores: Vec<f64>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub activity_events: Vec<ActivityEvent>,
    pub typing_events: u64,
    pub mouse_events: u64,
}

impl LiveSessionSnapshot {
    pub fn latest_focus(&self) -> Option<f64> {
        self.focus_scores.last().copied()
    }

    pub fn latest_productivity(&self) -> Option<f64> {
        self.productivity_scores.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> LiveSession {
        LiveSession::new(Utc::now(), Instant::now(), "app", "window")
    }

    #[tokio::test]
    async fn samples_stay_aligned_past_capacity() {
        let mut live = session();
        let start = live.started_at();
        for i in 0..(SCORE_WINDOW_CAPACITY + 25) {
            live.record_sample(
                start + chrono::Duration::seconds(i as i64),
                i as f64,
                MetricSample {
                    focus: 50.0,
                    productivity: 60.0,
                },
            );
        }

        let snapshot = live.snapshot();
        assert_eq!(snapshot.timestamps.len(), SCORE_WINDOW_CAPACITY);
        assert_eq!(snapshot.focus_scores.len(), SCORE_WINDOW_CAPACITY);
        assert_eq!(snapshot.productivity_scores.len(), SCORE_WINDOW_CAPACITY);
        assert_eq!(snapshot.timestamps[0], start + chrono::Duration::seconds(25));
        assert_eq!(snapshot.duration_seconds, (SCORE_WINDOW_CAPACITY + 24) as u64);
    }

    #[tokio::test]
    async fn duration_is_monotonic() {
        let mut live = session();
        let sample = MetricSample {
            focus: 90.0,
            productivity: 90.0,
        };
        live.record_sample(Utc::now(), 12.7, sample);
        live.record_sample(Utc::now(), 11.2, sample);
        assert_eq!(live.duration_seconds(), 12);
    }

    #[tokio::test]
    async fn activity_accumulates_counters() {
        let mut live = session();
        for _ in 0..(ACTIVITY_WINDOW_CAPACITY + 5) {
            live.record_activity(ActivityEvent {
                timestamp: Utc::now(),
                typing_events: 7,
                mouse_events: 3,
            });
        }

        let snapshot = live.snapshot();
        assert_eq!(snapshot.activity_events.len(), ACTIVITY_WINDOW_CAPACITY);
        assert_eq!(snapshot.typing_events, 7 * (ACTIVITY_WINDOW_CAPACITY as u64 + 5));
        assert_eq!(snapshot.mouse_events, 3 * (ACTIVITY_WINDOW_CAPACITY as u64 + 5));
    }
}
