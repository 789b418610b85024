pub mod algorithm;
pub mod bill;
pub mod common;
pub mod dataset;
pub mod resource;
pub mod result_set;
pub mod user;
pub mod user_context;

pub use algorithm::*;
pub use bill::*;
pub use common::*;
pub use dataset::*;
pub use resource::*;
pub use result_set::*;
pub use user::*;
pub use user_context::*;
