pub mod config;
pub mod error;
pub mod metrics;
pub mod month;
pub mod types;
pub mod warnings;

pub use config::*;
pub use error::*;
pub use types::*;
pub use warnings::*;
