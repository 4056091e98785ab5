//! Midnight auto-checkout of sessions carried over from earlier days.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use telehub_core::error::AppError;
use telehub_service::TeleworkService;

use crate::job::JobHandler;

/// Force-closes sessions still open from work dates before today.
pub struct AutoCheckoutJob {
    telework: Arc<TeleworkService>,
}

impl AutoCheckoutJob {
    /// Creates the job over the telework service.
    pub fn new(telework: Arc<TeleworkService>) -> Self {
        Self { telework }
    }
}

#[async_trait]
impl JobHandler for AutoCheckoutJob {
    fn name(&self) -> &'static str {
        "midnight_auto_checkout"
    }

    async fn run(&self) -> Result<u64, AppError> {
        let today = Utc::now().date_naive();
        let closed = self.telework.close_overdue(today).await?;
        if closed > 0 {
            info!(closed, "Auto-checkout of overdue sessions finished");
        }
        Ok(closed)
    }
}
