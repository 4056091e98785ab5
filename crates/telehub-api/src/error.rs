//! HTTP response mapping for domain errors.
//!
//! The `IntoResponse` impl for [`AppError`] lives in `telehub-core` (behind
//! its `http` feature) so that the impl is coherent with the type's defining
//! crate; this module exercises that mapping.

pub use telehub_core::types::ApiErrorResponse;
