use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::providers::Middleware;
use ethers::types::{Address, TxHash, U256};
use log::info;
use std::sync::Arc;

use crate::ethereum::submitter::confirm_receipt;

// The dummy tutorial tokens are plain ERC20 contracts with an extra
// `mint(amount)` faucet method.
abigen!(
    DummyErc20,
    r#"[
        function decimals() external view returns (uint8)
        function balanceOf(address owner) external view returns (uint256)
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 amount) external returns (bool)
        function mint(uint256 amount) external
    ]"#
);

/// Contract-call surface the swap flow consumes from an ERC20 token.
///
/// Reads are single calls with no caching; writes wait for confirmation and
/// error on revert.
#[async_trait]
pub trait TokenGateway: Send + Sync {
    async fn decimals(&self, token: Address) -> Result<u8>;

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256>;

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash>;

    async fn mint(&self, token: Address, amount: U256) -> Result<TxHash>;
}

pub struct Erc20Gateway<M> {
    client: Arc<M>,
}

impl<M: Middleware + 'static> Erc20Gateway<M> {
    pub fn new(client: Arc<M>) -> Self {
        Self { client }
    }

    fn contract(&self, token: Address) -> DummyErc20<M> {
        DummyErc20::new(token, self.client.clone())
    }
}

#[async_trait]
impl<M: Middleware + 'static> TokenGateway for Erc20Gateway<M> {
    async fn decimals(&self, token: Address) -> Result<u8> {
        self.contract(token)
            .decimals()
            .call()
            .await
            .map_err(|e| anyhow!("Failed to read decimals of {:#x}: {}", token, e))
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        self.contract(token)
            .balance_of(owner)
            .call()
            .await
            .map_err(|e| anyhow!("Failed to read balance of {:#x}: {}", token, e))
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        self.contract(token)
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| anyhow!("Failed to read allowance of {:#x}: {}", token, e))
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        info!(
            "Approving {:#x} to spend {} base units of {:#x}",
            spender, amount, token
        );

        let contract = self.contract(token);
        let call = contract.approve(spender, amount);
        let pending = call
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send approval: {}", e))?;

        let tx_hash = *pending;
        let receipt = pending
            .await
            .map_err(|e| anyhow!("Failed while waiting for approval {:#x}: {}", tx_hash, e))?;

        confirm_receipt(receipt, tx_hash)
    }

    async fn mint(&self, token: Address, amount: U256) -> Result<TxHash> {
        info!("Minting {} base units of {:#x}", amount, token);

        let contract = self.contract(token);
        let call = contract.mint(amount);
        let pending = call
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send mint: {}", e))?;

        let tx_hash = *pending;
        let receipt = pending
            .await
            .map_err(|e| anyhow!("Failed while waiting for mint {:#x}: {}", tx_hash, e))?;

        confirm_receipt(receipt, tx_hash)
    }
}
