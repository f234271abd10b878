//! Server state management
//!
//! Process-wide configuration and counters shared by handlers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

/// Outcome counters for final submissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionStats {
    pub saved: u64,
    pub rejected: u64,
    pub failed: u64,
}

/// Core server state
#[derive(Debug)]
pub struct ServerState {
    pub bind_address: SocketAddr,
    pub data_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub server_start_time: Instant,

    submissions_saved: AtomicU64,
    submissions_rejected: AtomicU64,
    submissions_failed: AtomicU64,
    telemetry_events: AtomicU64,
    malformed_messages: AtomicU64,
}

impl ServerState {
    pub fn new(bind_address: SocketAddr, data_dir: PathBuf, static_dir: Option<PathBuf>) -> Self {
        Self {
            bind_address,
            data_dir,
            static_dir,
            server_start_time: Instant::now(),
            submissions_saved: AtomicU64::new(0),
            submissions_rejected: AtomicU64::new(0),
            submissions_failed: AtomicU64::new(0),
            telemetry_events: AtomicU64::new(0),
            malformed_messages: AtomicU64::new(0),
        }
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }

    pub fn record_saved(&self) {
        self.submissions_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.submissions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.submissions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_telemetry(&self) {
        self.telemetry_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn submission_stats(&self) -> SubmissionStats {
        SubmissionStats {
            saved: self.submissions_saved.load(Ordering::Relaxed),
            rejected: self.submissions_rejected.load(Ordering::Relaxed),
            failed: self.submissions_failed.load(Ordering::Relaxed),
        }
    }

    pub fn telemetry_count(&self) -> u64 {
        self.telemetry_events.load(Ordering::Relaxed)
    }

    pub fn malformed_count(&self) -> u64 {
        self.malformed_messages.load(Ordering::Relaxed)
    }
}
