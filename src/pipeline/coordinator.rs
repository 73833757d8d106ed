//! Single-run guard and pollable run status.

use std::sync::Arc;

use tokio::sync::{watch, Mutex, OwnedMutexGuard};

use super::PipelineError;
use crate::models::RunStatus;

/// Owns the exclusive right to run the pipeline and publishes its status.
///
/// Cloning shares the same guard and status channel.
#[derive(Clone)]
pub struct RunCoordinator {
    slot: Arc<Mutex<()>>,
    status: Arc<watch::Sender<RunStatus>>,
}

impl Default for RunCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RunCoordinator {
    pub fn new() -> Self {
        let (status, _) = watch::channel(RunStatus::default());
        Self {
            slot: Arc::new(Mutex::new(())),
            status: Arc::new(status),
        }
    }

    /// Claim the run slot without waiting.
    ///
    /// Fails with [`PipelineError::AlreadyRunning`] while another guard lives.
    pub fn try_begin(&self) -> Result<RunGuard, PipelineError> {
        let permit = self
            .slot
            .clone()
            .try_lock_owned()
            .map_err(|_| PipelineError::AlreadyRunning)?;
        self.status.send_replace(RunStatus::started());
        Ok(RunGuard {
            status: self.status.clone(),
            _permit: permit,
        })
    }

    /// Current status snapshot.
    pub fn status(&self) -> RunStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<RunStatus> {
        self.status.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.status.borrow().is_running
    }
}

/// Held for the duration of one run. Dropping it resets the status and
/// releases the slot, whether the run finished or failed.
pub struct RunGuard {
    status: Arc<watch::Sender<RunStatus>>,
    _permit: OwnedMutexGuard<()>,
}

impl RunGuard {
    /// Mark `source` (display name) as active at `progress`.
    pub fn enter_source(&self, source: &str, progress: u8) {
        self.status.send_modify(|s| {
            s.current_source = Some(source.to_string());
            s.progress = progress.min(100);
        });
    }

    pub fn set_progress(&self, progress: u8) {
        self.status.send_modify(|s| s.progress = progress.min(100));
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        // Runs before `_permit` is released.
        self.status.send_replace(RunStatus::default());
    }
}
