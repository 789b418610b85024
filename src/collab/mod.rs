pub mod billing;
pub mod executor;
pub mod identity;

pub use billing::*;
pub use executor::*;
pub use identity::*;
