//! ERC20 swap bot - Main executable
//!
//! This is the entry point for the CLI that mints test tokens, manages
//! transfer allowances, and fills swaps quoted by a 0x-style API, all through
//! a locally-signed JSON-RPC connection.
use anyhow::Result;
use dotenv::dotenv;
use log::info;
use std::env;

use zeroex_swap_bot::commands::{print_usage, run_command, Command};
use zeroex_swap_bot::config::Config;
use zeroex_swap_bot::ethereum::{
    create_ethereum_client, generate_wallet, load_wallet, parse_address, Erc20Gateway,
    EthereumSubmitter,
};
use zeroex_swap_bot::zeroex::{SwapService, ZeroExQuoteService};

/// Application entry point
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    // Commands that need no chain connection
    match command {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Wallet => {
            let (private_key, address) = generate_wallet();
            println!("address:     {}", address);
            println!("private key: 0x{}", private_key);
            println!("Fund the address with testnet ETH, then set PRIVATE_KEY to use it.");
            return Ok(());
        }
        _ => {}
    }

    let config = Config::from_env();
    info!("Starting 0x swap bot v{}", zeroex_swap_bot::VERSION);

    let wallet = load_wallet()?;
    let client = create_ethereum_client(&config.rpc_url, wallet, config.chain_id).await?;
    let taker = client.address();
    info!("Using account {:#x}", taker);

    let service = SwapService::new(
        Erc20Gateway::new(client.clone()),
        ZeroExQuoteService::new(config.quote_api_url.clone()),
        EthereumSubmitter::new(client.clone()),
        taker,
        parse_address(&config.erc20_proxy_address)?,
        zeroex_swap_bot::commands::default_approval(&config),
    );

    run_command(command, &service, &config).await
}
