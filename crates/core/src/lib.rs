pub mod config;
pub mod error;
pub mod sentence;

pub use config::Config;
pub use error::*;
pub use sentence::*;
