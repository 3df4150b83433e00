use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::live::{LiveSession, LiveSessionSnapshot};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TrackerStatus {
    #[default]
    Idle,
    Tracking,
}

/// What a reader sees when polling the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "session", rename_all = "camelCase")]
pub enum TrackerSnapshot {
    Idle,
    Tracking(LiveSessionSnapshot),
}

impl TrackerSnapshot {
    pub fn is_idle(&self) -> bool {
        matches!(self, TrackerSnapshot::Idle)
    }

    pub fn session(&self) -> Option<&LiveSessionSnapshot> {
        match self {
            TrackerSnapshot::Idle => None,
            TrackerSnapshot::Tracking(session) => Some(session),
        }
    }
}

/// Engine state machine. A live session exists exactly while `Tracking`.
#[derive(Debug, Default)]
pub(crate) struct TrackerState {
    status: TrackerStatus,
    live: Option<Arc<Mutex<LiveSession>>>,
}

impl TrackerState {
    pub fn status(&self) -> TrackerStatus {
        self.status
    }

    pub fn live(&self) -> Option<&Arc<Mutex<LiveSession>>> {
        self.live.as_ref()
    }

    pub fn begin_session(&mut self, live: Arc<Mutex<LiveSession>>) {
        self.status = TrackerStatus::Tracking;
        self.live = Some(live);
    }

    /// Returns to `Idle` and hands back the released session, if any.
    pub fn finish(&mut self) -> Option<Arc<Mutex<LiveSession>>> {
        self.status = TrackerStatus::Idle;
        self.live.take()
    }
}
