use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::live::LiveSession;

use super::loop_worker::sampling_loop;
use super::synthesizer::MetricSynthesizer;

/// Owns the background sampling task for at most one live session.
pub struct SamplingController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SamplingController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start_sampling(
        &mut self,
        live: Arc<Mutex<LiveSession>>,
        synthesizer: MetricSynthesizer,
        sample_interval: Duration,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("sampling already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(sampling_loop(
            live,
            synthesizer,
            sample_interval,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        info!("Sampling loop started ({}ms interval)", sample_interval.as_millis());
        Ok(())
    }

    /// Cancels the loop and waits for it to exit; no sample lands after this returns.
    pub async fn stop_sampling(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sampling loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for SamplingController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SamplingController {
    fn drop(&mut self) {
        // The detached loop holds its own session handle; cancel it so it exits.
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}
