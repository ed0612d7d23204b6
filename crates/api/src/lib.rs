pub mod metrics;
pub mod routes;

pub use metrics::*;
pub use routes::*;
