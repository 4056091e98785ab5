//! Repository implementations for all TeleHub entities.

pub mod attendance;
pub mod task;
pub mod telework_session;
pub mod user;

pub use attendance::AttendanceRepository;
pub use task::TaskRepository;
pub use telework_session::TeleworkSessionRepository;
pub use user::UserRepository;
