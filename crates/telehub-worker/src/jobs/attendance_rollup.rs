//! Daily attendance rollup — repair pass over yesterday's sessions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::info;

use telehub_core::error::AppError;
use telehub_service::AttendanceService;

use crate::job::JobHandler;

/// Ensures every closed session from the previous day has an
/// attendance row, recomputing totals from the session records.
pub struct AttendanceRollupJob {
    attendance: Arc<AttendanceService>,
}

impl AttendanceRollupJob {
    /// Creates the job over the attendance service.
    pub fn new(attendance: Arc<AttendanceService>) -> Self {
        Self { attendance }
    }
}

#[async_trait]
impl JobHandler for AttendanceRollupJob {
    fn name(&self) -> &'static str {
        "attendance_rollup"
    }

    async fn run(&self) -> Result<u64, AppError> {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let written = self.attendance.rollup_for(yesterday).await?;
        info!(written, work_date = %yesterday, "Attendance rollup finished");
        Ok(written)
    }
}
