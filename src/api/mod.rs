pub mod auth;
pub mod bill_handlers;
pub mod error;
pub mod handlers;
pub mod result_handlers;
pub mod routes;
pub mod user_handlers;

pub use error::*;
pub use routes::*;
