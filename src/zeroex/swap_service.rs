use anyhow::Result;
use async_trait::async_trait;
use ethers::types::{Address, TransactionRequest, TxHash};
use log::{debug, info};
use rust_decimal::Decimal;

use crate::ethereum::erc20::TokenGateway;
use crate::ethereum::submitter::TransactionSubmitter;
use crate::model::{ApprovalAmount, BotError, SwapOutcome, TokenStatus};
use crate::utils::{from_base_units, to_base_units};
use crate::zeroex::models::QuoteParams;
use crate::zeroex::quote_service::QuoteService;

/// Parameters for a swap, amounts in human-readable units.
#[derive(Debug, Clone)]
pub struct SwapParams {
    pub buy_token: Address,
    pub sell_token: Address,
    pub sell_amount: Decimal,
}

/// Service sequencing a swap end to end: resolve decimals, convert to base
/// units, gate on balance and allowance, fetch a quote, submit and confirm.
pub struct SwapService<T, Q, S>
where
    T: TokenGateway,
    Q: QuoteService,
    S: TransactionSubmitter,
{
    token_gateway: T,
    quote_service: Q,
    submitter: S,
    taker: Address,
    erc20_proxy: Address,
    approval: ApprovalAmount,
}

impl<T, Q, S> SwapService<T, Q, S>
where
    T: TokenGateway,
    Q: QuoteService,
    S: TransactionSubmitter,
{
    pub fn new(
        token_gateway: T,
        quote_service: Q,
        submitter: S,
        taker: Address,
        erc20_proxy: Address,
        approval: ApprovalAmount,
    ) -> Self {
        Self {
            token_gateway,
            quote_service,
            submitter,
            taker,
            erc20_proxy,
            approval,
        }
    }

    /// Executes a swap and returns the outcome once the fill transaction is
    /// mined. Aborts before any quote request if the balance cannot cover the
    /// sell amount; tops up the allowance with a single approval if needed.
    pub async fn execute_swap(&self, params: &SwapParams) -> Result<SwapOutcome> {
        let decimals = self.token_gateway.decimals(params.sell_token).await?;
        let sell_base = to_base_units(params.sell_amount, decimals)?;

        let balance = self
            .token_gateway
            .balance_of(params.sell_token, self.taker)
            .await?;
        if balance < sell_base {
            return Err(BotError::InsufficientBalance {
                available: from_base_units(balance, decimals)?,
                requested: params.sell_amount,
            }
            .into());
        }

        let allowance = self
            .token_gateway
            .allowance(params.sell_token, self.taker, self.erc20_proxy)
            .await?;
        if allowance < sell_base {
            let approval_base = self.approval.base_units(decimals)?;
            info!(
                "Allowance {} below sell amount {}, approving {:?}",
                allowance, sell_base, self.approval
            );
            let approval_hash = self
                .token_gateway
                .approve(params.sell_token, self.erc20_proxy, approval_base)
                .await?;
            info!("Approval transaction {:#x} confirmed", approval_hash);
        }

        let quote = self
            .quote_service
            .get_swap_quote(&QuoteParams {
                buy_token: params.buy_token,
                sell_token: params.sell_token,
                sell_amount: sell_base,
                taker_address: self.taker,
            })
            .await?;

        debug!(
            "Filling quote via {:#x}, gas {}, gas price {}",
            quote.to, quote.gas, quote.gas_price
        );

        let tx = TransactionRequest::new()
            .from(self.taker)
            .to(quote.to)
            .data(quote.data.clone())
            .gas(quote.gas)
            .gas_price(quote.gas_price)
            .value(quote.value);

        let transaction_hash = self.submitter.submit_and_confirm(tx).await?;

        let buy_decimals = self.token_gateway.decimals(params.buy_token).await?;

        Ok(SwapOutcome {
            sell_token: params.sell_token,
            buy_token: params.buy_token,
            sell_amount: params.sell_amount,
            buy_amount: from_base_units(quote.buy_amount, buy_decimals)?,
            transaction_hash,
        })
    }

    /// Mints test tokens through the dummy token's faucet method.
    pub async fn mint(&self, token: Address, amount: Decimal) -> Result<TxHash> {
        let decimals = self.token_gateway.decimals(token).await?;
        let base = to_base_units(amount, decimals)?;

        self.token_gateway.mint(token, base).await
    }

    /// Grants the transfer proxy an explicit allowance.
    pub async fn set_allowance(&self, token: Address, amount: &ApprovalAmount) -> Result<TxHash> {
        let decimals = self.token_gateway.decimals(token).await?;
        let base = amount.base_units(decimals)?;

        self.token_gateway
            .approve(token, self.erc20_proxy, base)
            .await
    }

    /// Read-only balance/allowance snapshot for display.
    pub async fn token_status(&self, symbol: &str, token: Address) -> Result<TokenStatus> {
        let decimals = self.token_gateway.decimals(token).await?;
        let balance = self.token_gateway.balance_of(token, self.taker).await?;
        let allowance = self
            .token_gateway
            .allowance(token, self.taker, self.erc20_proxy)
            .await?;

        Ok(TokenStatus {
            symbol: symbol.to_string(),
            address: token,
            decimals,
            balance: from_base_units(balance, decimals)?,
            allowance,
        })
    }
}
