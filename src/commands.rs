use anyhow::{anyhow, Result};
use log::{error, info};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;
use crate::ethereum::erc20::TokenGateway;
use crate::ethereum::submitter::TransactionSubmitter;
use crate::ethereum::wallet::parse_address;
use crate::model::{ApprovalAmount, BotError};
use crate::utils::format_token_amount;
use crate::zeroex::quote_service::QuoteService;
use crate::zeroex::swap_service::{SwapParams, SwapService};

/// The original tutorial's swap buttons traded 100 units at a time.
pub const DEFAULT_SWAP_UNITS: u64 = 100;

// The two tutorial tokens the bot knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSymbol {
    Dai,
    Usdc,
}

impl TokenSymbol {
    pub fn address(&self, config: &Config) -> Result<ethers::types::Address> {
        match self {
            TokenSymbol::Dai => parse_address(&config.dai_address),
            TokenSymbol::Usdc => parse_address(&config.usdc_address),
        }
    }
}

impl FromStr for TokenSymbol {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dai" => Ok(TokenSymbol::Dai),
            "usdc" => Ok(TokenSymbol::Usdc),
            other => Err(anyhow!("Unknown token symbol '{}', expected dai or usdc", other)),
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenSymbol::Dai => write!(f, "DAI"),
            TokenSymbol::Usdc => write!(f, "USDC"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Mint {
        token: TokenSymbol,
        amount: Option<Decimal>,
    },
    Approve {
        token: TokenSymbol,
        amount: Option<ApprovalAmount>,
    },
    Swap {
        sell: TokenSymbol,
        buy: TokenSymbol,
        amount: Option<Decimal>,
    },
    Balances,
    Wallet,
    Watch,
    Help,
}

impl Command {
    /// Parses a command from CLI arguments (program name already stripped).
    pub fn parse(args: &[String]) -> Result<Command> {
        let mut words = args.iter().map(String::as_str);

        let command = match words.next() {
            None | Some("help") => Command::Help,
            Some("mint") => {
                let token = required_token(words.next())?;
                let amount = words.next().map(parse_amount).transpose()?;
                Command::Mint { token, amount }
            }
            Some("approve") => {
                let token = required_token(words.next())?;
                let amount = match words.next() {
                    None => None,
                    Some("unlimited") => Some(ApprovalAmount::Unlimited),
                    Some(raw) => Some(ApprovalAmount::Units(parse_amount(raw)?)),
                };
                Command::Approve { token, amount }
            }
            Some("swap") => {
                let sell = required_token(words.next())?;
                let buy = required_token(words.next())?;
                if sell == buy {
                    return Err(anyhow!("Sell and buy tokens must be different"));
                }
                let amount = words.next().map(parse_amount).transpose()?;
                Command::Swap { sell, buy, amount }
            }
            Some("balances") => Command::Balances,
            Some("wallet") => Command::Wallet,
            Some("watch") => Command::Watch,
            Some(other) => return Err(anyhow!("Unknown command: {}", other)),
        };

        Ok(command)
    }
}

fn required_token(word: Option<&str>) -> Result<TokenSymbol> {
    word.ok_or_else(|| anyhow!("Expected a token symbol (dai or usdc)"))?
        .parse()
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    let amount =
        Decimal::from_str(raw).map_err(|_| BotError::InvalidAmount(raw.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(BotError::InvalidAmount(raw.to_string()).into());
    }

    Ok(amount)
}

pub fn print_usage() {
    println!(
        "Usage: zeroex-swap-bot <command>\n\n\
         Commands:\n\
         \x20 mint <dai|usdc> [amount]        mint test tokens (default {mint})\n\
         \x20 approve <dai|usdc> [amount]     grant the exchange proxy an allowance\n\
         \x20                                 ('unlimited' for the max sentinel)\n\
         \x20 swap <sell> <buy> [amount]      swap tokens via the quote API (default {swap})\n\
         \x20 balances                        show balances and allowances once\n\
         \x20 watch                           refresh balances and allowances periodically\n\
         \x20 wallet                          generate a fresh wallet\n\
         \x20 help                            show this message",
        mint = Config::default().default_mint_amount,
        swap = DEFAULT_SWAP_UNITS,
    );
}

/// Dispatches a parsed command against the wired-up swap service.
pub async fn run_command<T, Q, S>(
    command: Command,
    service: &SwapService<T, Q, S>,
    config: &Config,
) -> Result<()>
where
    T: TokenGateway,
    Q: QuoteService,
    S: TransactionSubmitter,
{
    match command {
        Command::Mint { token, amount } => {
            let amount = amount.unwrap_or(config.default_mint_amount);
            let tx_hash = service.mint(token.address(config)?, amount).await?;
            info!("Minted {} {}: transaction {:#x}", amount, token, tx_hash);
        }
        Command::Approve { token, amount } => {
            let amount = amount.unwrap_or_else(|| default_approval(config));
            let tx_hash = service
                .set_allowance(token.address(config)?, &amount)
                .await?;
            info!("Allowance for {} updated: transaction {:#x}", token, tx_hash);
        }
        Command::Swap { sell, buy, amount } => {
            let sell_amount = amount.unwrap_or_else(|| Decimal::from(DEFAULT_SWAP_UNITS));
            let outcome = service
                .execute_swap(&SwapParams {
                    buy_token: buy.address(config)?,
                    sell_token: sell.address(config)?,
                    sell_amount,
                })
                .await?;
            info!(
                "Swapped {} {} for {} {}: transaction {:#x}",
                outcome.sell_amount, sell, outcome.buy_amount, buy, outcome.transaction_hash
            );
        }
        Command::Balances => {
            report_statuses(service, config).await?;
        }
        Command::Watch => {
            let mut interval =
                tokio::time::interval(Duration::from_secs(config.poll_interval_secs));
            loop {
                interval.tick().await;
                // Read-only refresh; a failed poll is logged and retried on
                // the next tick.
                if let Err(e) = report_statuses(service, config).await {
                    error!("Failed to refresh balances: {}", e);
                }
            }
        }
        Command::Wallet | Command::Help => print_usage(),
    }

    Ok(())
}

/// Approval amount used when the command line does not specify one.
pub fn default_approval(config: &Config) -> ApprovalAmount {
    if config.unlimited_approvals {
        ApprovalAmount::Unlimited
    } else {
        ApprovalAmount::Units(config.default_approval_amount)
    }
}

async fn report_statuses<T, Q, S>(
    service: &SwapService<T, Q, S>,
    config: &Config,
) -> Result<()>
where
    T: TokenGateway,
    Q: QuoteService,
    S: TransactionSubmitter,
{
    for token in [TokenSymbol::Dai, TokenSymbol::Usdc] {
        let status = service
            .token_status(&token.to_string(), token.address(config)?)
            .await?;
        info!(
            "{}: balance {}, allowance {}",
            status.symbol,
            status.balance.normalize(),
            format_token_amount(status.allowance, status.decimals)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn no_arguments_means_help() {
        assert!(matches!(Command::parse(&[]).unwrap(), Command::Help));
    }

    #[test]
    fn parses_mint_with_and_without_amount() {
        match Command::parse(&args(&["mint", "dai"])).unwrap() {
            Command::Mint { token, amount } => {
                assert_eq!(token, TokenSymbol::Dai);
                assert!(amount.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        match Command::parse(&args(&["mint", "usdc", "250"])).unwrap() {
            Command::Mint { token, amount } => {
                assert_eq!(token, TokenSymbol::Usdc);
                assert_eq!(amount, Some(Decimal::from(250)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_unlimited_approval() {
        match Command::parse(&args(&["approve", "dai", "unlimited"])).unwrap() {
            Command::Approve { amount, .. } => {
                assert!(matches!(amount, Some(ApprovalAmount::Unlimited)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_a_swap_pair() {
        match Command::parse(&args(&["swap", "dai", "usdc", "100"])).unwrap() {
            Command::Swap { sell, buy, amount } => {
                assert_eq!(sell, TokenSymbol::Dai);
                assert_eq!(buy, TokenSymbol::Usdc);
                assert_eq!(amount, Some(Decimal::from(100)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_swapping_a_token_for_itself() {
        assert!(Command::parse(&args(&["swap", "dai", "dai"])).is_err());
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(Command::parse(&args(&["mint", "dai", "0"])).is_err());
        assert!(Command::parse(&args(&["mint", "dai", "-5"])).is_err());
        assert!(Command::parse(&args(&["mint", "dai", "abc"])).is_err());
    }

    #[test]
    fn rejects_unknown_commands_and_tokens() {
        assert!(Command::parse(&args(&["frobnicate"])).is_err());
        assert!(Command::parse(&args(&["mint", "weth"])).is_err());
    }
}
