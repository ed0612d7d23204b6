pub mod badge;
pub mod bet;
pub mod error;
pub mod fixture;
pub mod money;
pub mod risk;
pub mod snapshot;
pub mod stats;
pub mod user;

pub use badge::*;
pub use bet::*;
pub use error::*;
pub use fixture::*;
pub use money::*;
pub use risk::*;
pub use snapshot::*;
pub use stats::*;
pub use user::*;
