use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::Deserialize;

use crate::model::BotError;
use crate::zeroex::models::{QuoteParams, SwapQuote};

// Error body shape of the quote API
#[derive(Deserialize)]
struct ErrorResponse {
    reason: String,
}

/// Service fetching swap quotes from the exchange API.
///
/// A quote request is a single GET with no retry; any non-success response is
/// terminal for the swap attempt.
#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn get_swap_quote(&self, params: &QuoteParams) -> Result<SwapQuote>;
}

pub struct ZeroExQuoteService {
    http_client: Client,
    base_url: String,
}

impl ZeroExQuoteService {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
        }
    }

    /// Builds the quote request URL. The sell amount is already in base units.
    pub fn quote_url(&self, params: &QuoteParams) -> String {
        format!(
            "{base_url}/swap/v0/quote?buyToken={buy_token:#x}&sellToken={sell_token:#x}&sellAmount={sell_amount}&takerAddress={taker:#x}",
            base_url = self.base_url.trim_end_matches('/'),
            buy_token = params.buy_token,
            sell_token = params.sell_token,
            sell_amount = params.sell_amount,
            taker = params.taker_address,
        )
    }

    // Check the API response for an error payload before deserializing
    fn check_for_api_error<T>(&self, value: serde_json::Value) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if let Ok(ErrorResponse { reason }) =
            serde_json::from_value::<ErrorResponse>(value.clone())
        {
            Err(BotError::QuoteApi(reason).into())
        } else {
            serde_json::from_value(value)
                .map_err(|e| anyhow!("Failed to deserialize quote response: {}", e))
        }
    }
}

#[async_trait]
impl QuoteService for ZeroExQuoteService {
    async fn get_swap_quote(&self, params: &QuoteParams) -> Result<SwapQuote> {
        let url = self.quote_url(params);
        debug!("Requesting quote: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Quote request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .map(|err| err.reason)
                .unwrap_or(body);

            error!("Quote API returned {}: {}", status, reason);

            // The most common causes are an unset allowance or a balance too
            // small to fill the sell amount.
            return Err(BotError::QuoteApi(format!(
                "{} (check that your allowance is set and your balance covers the trade)",
                reason
            ))
            .into());
        }

        let json_value = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| anyhow!("Failed to parse quote response as JSON: {}", e))?;

        let quote = self.check_for_api_error::<SwapQuote>(json_value)?;

        info!(
            "Quote received: sell {} base units, buy {} base units, price {}",
            quote.sell_amount, quote.buy_amount, quote.price
        );

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Address, U256};
    use std::str::FromStr;

    fn params() -> QuoteParams {
        QuoteParams {
            buy_token: Address::from_str("0x5a719Cf3E02c17c876F6d294aDb5CB7C6eB47e2F").unwrap(),
            sell_token: Address::from_str("0x48178164eB4769BB919414Adc980b659a634703E").unwrap(),
            sell_amount: U256::from(100u64) * U256::exp10(18),
            taker_address: Address::from_str("0x000000000000000000000000000000000000dEaD")
                .unwrap(),
        }
    }

    #[test]
    fn quote_url_carries_the_base_unit_sell_amount() {
        let service = ZeroExQuoteService::new("https://kovan.api.0x.org".to_string());
        let url = service.quote_url(&params());

        // 100 units of an 18-decimal token
        assert!(url.contains("sellAmount=100000000000000000000"));
        assert!(url.contains("/swap/v0/quote?"));
        assert!(url.contains("buyToken=0x5a719cf3e02c17c876f6d294adb5cb7c6eb47e2f"));
        assert!(url.contains("sellToken=0x48178164eb4769bb919414adc980b659a634703e"));
        assert!(url.contains("takerAddress=0x000000000000000000000000000000000000dead"));
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let service = ZeroExQuoteService::new("https://kovan.api.0x.org/".to_string());
        let url = service.quote_url(&params());
        assert!(url.starts_with("https://kovan.api.0x.org/swap/v0/quote?"));
    }

    #[test]
    fn api_error_payload_surfaces_its_reason() {
        let service = ZeroExQuoteService::new("https://kovan.api.0x.org".to_string());
        let value = serde_json::json!({"code": 100, "reason": "Validation Failed"});

        let err = service.check_for_api_error::<SwapQuote>(value).unwrap_err();
        match err.downcast_ref::<BotError>() {
            Some(BotError::QuoteApi(reason)) => assert_eq!(reason, "Validation Failed"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
