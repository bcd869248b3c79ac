// Shared API types: response envelopes and request validation

pub mod common;
pub mod validation;

pub use common::{ErrorResponse, FieldError, MessageResponse};
