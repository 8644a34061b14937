pub mod catalog;
pub mod criteria;
pub mod update_plan;
pub mod verses;

pub use catalog::*;
pub use criteria::*;
pub use update_plan::*;
pub use verses::*;
