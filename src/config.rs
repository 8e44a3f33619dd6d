use rust_decimal::Decimal;
use std::env;

// Attention! The two token contracts below are dummy ERC20 tokens deployed on
// the Kovan testnet. They are not the real DAI and USDC, but they are drop-in
// replacements with an extra `mint(amount)` faucet method.
pub const FAKE_DAI: &str = "0x48178164eB4769BB919414Adc980b659a634703E";
pub const FAKE_USDC: &str = "0x5a719Cf3E02c17c876F6d294aDb5CB7C6eB47e2F";

/// The 0x exchange ERC20 transfer proxy on Kovan, the spender every swap
/// allowance is granted to.
pub const KOVAN_ERC20_PROXY: &str = "0xf1ec01d6236d3cd881a0bf0130ea25fe4234003e";

pub const KOVAN_0X_API: &str = "https://kovan.api.0x.org";
pub const KOVAN_CHAIN_ID: u64 = 42;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint
    pub rpc_url: String,

    /// Chain id the bot refuses to run without
    pub chain_id: u64,

    /// Base URL for the swap quote API
    pub quote_api_url: String,

    /// Test DAI token contract address
    pub dai_address: String,

    /// Test USDC token contract address
    pub usdc_address: String,

    /// ERC20 transfer proxy the exchange pulls sold tokens through
    pub erc20_proxy_address: String,

    /// Unit amount minted when `mint` is called without an amount
    pub default_mint_amount: Decimal,

    /// Unit amount approved when the allowance gate tops up
    pub default_approval_amount: Decimal,

    /// Grant the unlimited sentinel instead of the default amount
    pub unlimited_approvals: bool,

    /// Seconds between balance/allowance refreshes in `watch`
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://kovan.infura.io/v3/f98b693fe61e41ada1a82dab93a3a888".to_string(),
            chain_id: KOVAN_CHAIN_ID,
            quote_api_url: KOVAN_0X_API.to_string(),
            dai_address: FAKE_DAI.to_string(),
            usdc_address: FAKE_USDC.to_string(),
            erc20_proxy_address: KOVAN_ERC20_PROXY.to_string(),
            default_mint_amount: Decimal::from(1_000),
            default_approval_amount: Decimal::from(1_000),
            unlimited_approvals: false,
            poll_interval_secs: 10,
        }
    }
}

impl Config {
    /// Creates a configuration from environment variables, falling back to the
    /// Kovan tutorial defaults.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Self {
            rpc_url: env::var("RPC_URL").unwrap_or(defaults.rpc_url),
            chain_id: env::var("CHAIN_ID")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.chain_id),
            quote_api_url: env::var("QUOTE_API_URL").unwrap_or(defaults.quote_api_url),
            dai_address: env::var("DAI_ADDRESS").unwrap_or(defaults.dai_address),
            usdc_address: env::var("USDC_ADDRESS").unwrap_or(defaults.usdc_address),
            erc20_proxy_address: env::var("ERC20_PROXY_ADDRESS")
                .unwrap_or(defaults.erc20_proxy_address),
            default_mint_amount: env::var("DEFAULT_MINT_AMOUNT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.default_mint_amount),
            default_approval_amount: env::var("DEFAULT_APPROVAL_AMOUNT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.default_approval_amount),
            unlimited_approvals: env::var("UNLIMITED_APPROVALS")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.unlimited_approvals),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.poll_interval_secs),
        }
    }
}
