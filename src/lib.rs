pub mod commands;
pub mod config;
pub mod ethereum;
pub mod model;
pub mod utils;
pub mod zeroex;

// Re-export commonly used items
pub use config::Config;
pub use model::{ApprovalAmount, BotError, SwapOutcome, TokenStatus};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
