use anyhow::Result;
use ethers::signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer};
use ethers::types::Address;
use ethers::utils::hex;
use std::env;
use std::str::FromStr;

use crate::model::BotError;

/// Load the signer from the environment: `PRIVATE_KEY` first, then `MNEMONIC`.
pub fn load_wallet() -> Result<LocalWallet> {
    if let Ok(key) = env::var("PRIVATE_KEY") {
        return wallet_from_private_key(&key);
    }

    if let Ok(phrase) = env::var("MNEMONIC") {
        return wallet_from_mnemonic(&phrase);
    }

    Err(BotError::WalletUnavailable(
        "set PRIVATE_KEY or MNEMONIC in the environment".to_string(),
    )
    .into())
}

/// Restore a wallet from a hex-encoded private key.
pub fn wallet_from_private_key(private_key: &str) -> Result<LocalWallet> {
    let trimmed = private_key
        .strip_prefix("0x")
        .unwrap_or(private_key)
        .trim();

    LocalWallet::from_str(trimmed)
        .map_err(|e| BotError::WalletUnavailable(format!("invalid private key: {}", e)).into())
}

/// Restore a wallet from a BIP-39 mnemonic phrase.
pub fn wallet_from_mnemonic(phrase: &str) -> Result<LocalWallet> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase.trim())
        .build()
        .map_err(|e| BotError::WalletUnavailable(format!("invalid mnemonic: {}", e)).into())
}

/// Generate a fresh random wallet for trying the demo.
///
/// Returns the hex private key and the checksummed address.
pub fn generate_wallet() -> (String, String) {
    let wallet = LocalWallet::new(&mut rand::thread_rng());
    let private_key = hex::encode(wallet.signer().to_bytes());
    let address = ethers::utils::to_checksum(&wallet.address(), None);

    (private_key, address)
}

/// Parse a hex string into an `Address`.
pub fn parse_address(address: &str) -> Result<Address> {
    Address::from_str(address.trim())
        .map_err(|_| BotError::InvalidAddress(address.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_addresses_with_and_without_prefix() {
        let with_prefix = parse_address("0x48178164eB4769BB919414Adc980b659a634703E").unwrap();
        let without_prefix = parse_address("48178164eB4769BB919414Adc980b659a634703E").unwrap();
        assert_eq!(with_prefix, without_prefix);
    }

    #[test]
    fn rejects_garbage_addresses() {
        assert!(parse_address("not-an-address").is_err());
        assert!(parse_address("0x1234").is_err());
    }

    #[test]
    fn generated_key_restores_the_same_wallet() {
        let (private_key, address) = generate_wallet();
        let restored = wallet_from_private_key(&private_key).unwrap();
        assert_eq!(ethers::utils::to_checksum(&restored.address(), None), address);
    }

    #[test]
    fn private_key_prefix_is_optional() {
        let (private_key, _) = generate_wallet();
        let plain = wallet_from_private_key(&private_key).unwrap();
        let prefixed = wallet_from_private_key(&format!("0x{}", private_key)).unwrap();
        assert_eq!(plain.address(), prefixed.address());
    }
}
