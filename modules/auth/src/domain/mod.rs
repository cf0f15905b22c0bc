pub mod error;
pub mod model;
pub mod repo;
pub mod resolver;
pub mod session;
pub mod token;
