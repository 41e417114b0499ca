pub mod dto;
pub mod error;
pub mod routes;
pub mod session;

pub use error::ApiError;
pub use routes::{create_router, AppState};
