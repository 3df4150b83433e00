mod types;

pub use types::ProcessUsage;

use std::sync::Arc;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::Mutex;

/// Samples CPU and memory usage of the current process.
///
/// CPU usage is a delta between refreshes, so the collector keeps its `System`
/// around and establishes a baseline on construction.
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    system: System,
    pid: Pid,
}

impl MetricsCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        let pid = Pid::from_u32(std::process::id());

        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        Self {
            inner: Arc::new(Mutex::new(MetricsState { system, pid })),
        }
    }

    pub async fn sample(&self) -> ProcessUsage {
        let mut state = self.inner.lock().await;
        let pid = state.pid;
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        match state.system.process(pid) {
            Some(process) => ProcessUsage {
                cpu_percent: f64::from(process.cpu_usage()),
                memory_mb: process.memory() as f64 / 1024.0 / 1024.0,
            },
            None => ProcessUsage::default(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_reports_non_negative_usage() {
        let collector = MetricsCollector::new();
        let usage = collector.sample().await;
        assert!(usage.cpu_percent >= 0.0);
        assert!(usage.memory_mb >= 0.0);
    }
}
