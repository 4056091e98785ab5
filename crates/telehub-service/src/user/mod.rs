//! User profile and administration use cases.

pub mod admin;
pub mod service;

pub use admin::{AdminUserService, CreateUserRequest, UpdateUserRequest};
pub use service::{ChangePasswordRequest, UpdateProfileRequest, UserService};
