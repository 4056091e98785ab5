//! # telehub-auth
//!
//! Authentication and authorization primitives for the TeleHub platform.
//!
//! ## Modules
//!
//! - `jwt` — JWT token creation and validation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `guards` — Role and ownership checks shared by the service layer

pub mod guards;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
