pub mod models;
pub mod quote_service;
pub mod swap_service;

// Re-exports for convenient use
pub use models::{LiquiditySource, QuoteParams, SwapQuote};
pub use quote_service::{QuoteService, ZeroExQuoteService};
pub use swap_service::{SwapParams, SwapService};
