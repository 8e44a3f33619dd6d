use anyhow::{anyhow, Result};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use log::info;
use std::sync::Arc;

use crate::model::BotError;

/// JSON-RPC provider with a local signer attached.
pub type EthereumClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Create an Ethereum client, refusing to start on the wrong network.
pub async fn create_ethereum_client(
    rpc_url: &str,
    wallet: LocalWallet,
    expected_chain_id: u64,
) -> Result<Arc<EthereumClient>> {
    let provider =
        Provider::<Http>::try_from(rpc_url).map_err(|e| anyhow!("Invalid RPC URL: {}", e))?;

    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| anyhow!("Failed to query chain id: {}", e))?
        .as_u64();

    if chain_id != expected_chain_id {
        return Err(BotError::WrongNetwork {
            expected: expected_chain_id,
            actual: chain_id,
        }
        .into());
    }

    info!("Connected to chain id {}", chain_id);

    let client = SignerMiddleware::new(provider, wallet.with_chain_id(chain_id));

    Ok(Arc::new(client))
}
