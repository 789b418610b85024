pub mod dual_write;
pub mod ownership;
pub mod validate;

pub use dual_write::*;
pub use ownership::*;
pub use validate::*;
