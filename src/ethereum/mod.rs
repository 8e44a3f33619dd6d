pub mod client;
pub mod erc20;
pub mod submitter;
pub mod wallet;

pub use client::{create_ethereum_client, EthereumClient};
pub use erc20::{Erc20Gateway, TokenGateway};
pub use submitter::{EthereumSubmitter, TransactionSubmitter};
pub use wallet::{generate_wallet, load_wallet, parse_address};
