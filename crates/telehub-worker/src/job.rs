//! The periodic job abstraction.

use async_trait::async_trait;

use telehub_core::error::AppError;

/// A unit of periodic maintenance work.
///
/// Handlers are stateless between runs; everything they need is injected
/// at construction. A run returns the number of rows it touched.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Stable job name used in schedules and logs.
    fn name(&self) -> &'static str;

    /// Executes one run of the job.
    async fn run(&self) -> Result<u64, AppError>;
}
