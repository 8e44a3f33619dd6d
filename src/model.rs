use ethers::types::{Address, TxHash, U256};
use rust_decimal::Decimal;

use crate::utils::to_base_units;

// Error type for the application
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Wallet is not available: {0}")]
    WalletUnavailable(String),

    #[error("Connected to chain id {actual}, expected chain id {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Insufficient balance: wallet holds {available}, tried to sell {requested}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Quote API error: {0}")]
    QuoteApi(String),

    #[error("Transaction {0:#x} reverted")]
    TransactionReverted(TxHash),

    #[error("Transaction {0:#x} was dropped before being mined")]
    TransactionDropped(TxHash),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Amount to pass to `approve` when the allowance gate tops up.
#[derive(Debug, Clone)]
pub enum ApprovalAmount {
    /// `2^256 - 1`, the unlimited-spending sentinel.
    Unlimited,
    /// A fixed unit amount, scaled by the token's decimals at approval time.
    Units(Decimal),
}

impl ApprovalAmount {
    /// Converts the approval amount to base units for the given token decimals.
    pub fn base_units(&self, decimals: u8) -> anyhow::Result<U256> {
        match self {
            ApprovalAmount::Unlimited => Ok(U256::MAX),
            ApprovalAmount::Units(amount) => to_base_units(*amount, decimals),
        }
    }
}

// Balance and allowance snapshot for display
#[derive(Debug, Clone)]
pub struct TokenStatus {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
    pub balance: Decimal,
    pub allowance: U256,
}

// Result of a completed swap
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub sell_token: Address,
    pub buy_token: Address,
    pub sell_amount: Decimal,
    pub buy_amount: Decimal,
    pub transaction_hash: TxHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_approval_is_max_sentinel() {
        let base = ApprovalAmount::Unlimited.base_units(18).unwrap();
        assert_eq!(base, U256::MAX);
    }

    #[test]
    fn fixed_approval_scales_by_decimals() {
        let base = ApprovalAmount::Units(Decimal::from(1_000))
            .base_units(6)
            .unwrap();
        assert_eq!(base, U256::from(1_000_000_000u64));
    }
}
