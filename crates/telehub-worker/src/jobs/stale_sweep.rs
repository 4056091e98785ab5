//! Stale session sweep — marks quiet sessions offline.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use telehub_core::error::AppError;
use telehub_service::TeleworkService;

use crate::job::JobHandler;

/// Flags open sessions whose heartbeats have stopped as offline.
///
/// Sessions are not closed; a returning client resumes by reporting
/// its next heartbeat.
pub struct StaleSweepJob {
    telework: Arc<TeleworkService>,
}

impl StaleSweepJob {
    /// Creates the job over the telework service.
    pub fn new(telework: Arc<TeleworkService>) -> Self {
        Self { telework }
    }
}

#[async_trait]
impl JobHandler for StaleSweepJob {
    fn name(&self) -> &'static str {
        "stale_session_sweep"
    }

    async fn run(&self) -> Result<u64, AppError> {
        let marked = self.telework.sweep_stale().await?;
        if marked > 0 {
            info!(marked, "Stale session sweep finished");
        }
        Ok(marked)
    }
}
