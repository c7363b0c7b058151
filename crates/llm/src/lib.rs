pub mod provider;
pub mod providers;
pub mod refiner;

pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
pub use refiner::{LlmRefiner, Refiner};
