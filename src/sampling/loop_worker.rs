use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::TrackerResult;
use crate::live::{ActivityEvent, LiveSession};

use super::synthesizer::MetricSynthesizer;

// Set to false to silence per-loop logging
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// Simulated input bursts are recorded once per this many seconds of elapsed time.
const ACTIVITY_BURST_PERIOD_SECS: f64 = 10.0;

pub async fn sampling_loop(
    live: Arc<Mutex<LiveSession>>,
    mut synthesizer: MetricSynthesizer,
    sample_interval: Duration,
    cancel_token: CancellationToken,
) {
    let session_id = live.lock().await.id().to_string();
    let mut ticker = tokio::time::interval(sample_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // A burst fires when elapsed lands in the first tick-width of each period.
    let burst_window = sample_interval
        .as_secs_f64()
        .clamp(f64::EPSILON, ACTIVITY_BURST_PERIOD_SECS);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("sampling loop for session {} shutting down", session_id);
                break;
            }
            _ = ticker.tick() => {
                if let Err(err) = take_sample(&live, &mut synthesizer, burst_window, &cancel_token).await {
                    log_error!("sampling loop for session {} terminated: {err}", session_id);
                    break;
                }
            }
        }
    }
}

async fn take_sample(
    live: &Mutex<LiveSession>,
    synthesizer: &mut MetricSynthesizer,
    burst_window: f64,
    cancel_token: &CancellationToken,
) -> TrackerResult<()> {
    let mut session = live.lock().await;

    // Stop may have fired while this tick waited on the lock.
    if cancel_token.is_cancelled() {
        return Ok(());
    }

    let elapsed = session.anchor().elapsed();
    let elapsed_secs = elapsed.as_secs_f64();
    let sample = synthesizer.sample(elapsed_secs)?;

    let millis = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
    let at = TimeDelta::try_milliseconds(millis)
        .and_then(|offset| session.started_at().checked_add_signed(offset))
        .unwrap_or_else(Utc::now);
    session.record_sample(at, elapsed_secs, sample);

    if elapsed_secs % ACTIVITY_BURST_PERIOD_SECS < burst_window {
        let (typing_events, mouse_events) = synthesizer.activity_burst();
        session.record_activity(ActivityEvent {
            timestamp: at,
            typing_events,
            mouse_events,
        });
    }

    Ok(())
}
