//! HTTP API: routes, handlers and public request/response bodies

pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::build_router;
