pub mod common;
pub mod filter;
pub mod patch;
pub mod song;

pub use common::*;
pub use filter::*;
pub use patch::*;
pub use song::*;
