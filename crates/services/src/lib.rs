pub mod aggregation;
pub mod data_source;
pub mod views;

pub use aggregation::*;
pub use data_source::*;
pub use views::*;
