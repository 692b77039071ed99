//! HTTP surface of the gateway

pub mod errors;
pub mod extract;
pub mod handlers;
pub mod manifest;
pub mod server;

pub use errors::{ApiError, ApiResult};
pub use extract::EncodedRequest;
pub use server::{create_router, start_api_server, AppState};
