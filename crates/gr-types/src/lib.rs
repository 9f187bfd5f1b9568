pub mod item;
pub mod errors;
pub mod logging;

pub use item::*;
pub use errors::*;
