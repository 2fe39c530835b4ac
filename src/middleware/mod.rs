//! Middleware components for request processing

pub mod cors;
pub mod validator;

pub use cors::cors_layer;
pub use validator::{InputValidator, ValidationError, MAX_BATCH_SIZE};
