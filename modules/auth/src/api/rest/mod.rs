pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use handlers::AuthState;
pub use routes::router;
