pub mod error;
pub mod memory;
pub mod postgres;
pub mod search_http;
pub mod traits;

pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use search_http::*;
pub use traits::*;
