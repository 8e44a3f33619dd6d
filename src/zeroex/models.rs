use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

// Module for deserializing string or numeric values as float
pub mod string_or_float {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrFloat;

        impl<'de> serde::de::Visitor<'de> for StringOrFloat {
            type Value = f64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a float or a string containing a float")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse::<f64>().map_err(serde::de::Error::custom)
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_str(&value)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value as f64)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value as f64)
            }
        }

        deserializer.deserialize_any(StringOrFloat)
    }
}

// Module for deserializing string or numeric values as U256. The API serves
// gas, gasPrice, value and the amounts as decimal strings or plain numbers
// depending on the field.
pub mod string_or_u256 {
    use ethers::types::U256;
    use serde::{self, Deserializer, Serializer};
    use std::fmt;
    use std::str::FromStr;

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrU256;

        impl<'de> serde::de::Visitor<'de> for StringOrU256 {
            type Value = U256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an unsigned integer or a string containing one")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if let Some(hex) = value.strip_prefix("0x") {
                    return U256::from_str(hex).map_err(serde::de::Error::custom);
                }
                U256::from_dec_str(value).map_err(serde::de::Error::custom)
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_str(&value)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(U256::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value < 0.0 || value.fract() != 0.0 {
                    return Err(serde::de::Error::custom(format!(
                        "{} is not an unsigned integer",
                        value
                    )));
                }
                Ok(U256::from(value as u64))
            }
        }

        deserializer.deserialize_any(StringOrU256)
    }
}

// Query parameters for a quote request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteParams {
    pub buy_token: Address,
    pub sell_token: Address,
    /// Sell amount in base units, never the raw unit amount.
    pub sell_amount: U256,
    pub taker_address: Address,
}

// A liquidity source contributing to the quoted route
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LiquiditySource {
    pub name: String,
    #[serde(with = "string_or_float")]
    pub proportion: f64,
}

/// A single swap opportunity returned by the quote API.
///
/// Valid only for a short, API-defined window and a specific order book state;
/// never cached or reused across calls. The `to`/`data`/`gas`/`gas_price`/
/// `value` fields form a ready-to-submit transaction descriptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    #[serde(with = "string_or_float")]
    pub price: f64,
    pub to: Address,
    pub data: Bytes,
    #[serde(with = "string_or_u256")]
    pub gas: U256,
    #[serde(with = "string_or_u256")]
    pub gas_price: U256,
    #[serde(with = "string_or_u256")]
    pub value: U256,
    #[serde(with = "string_or_u256")]
    pub buy_amount: U256,
    #[serde(with = "string_or_u256")]
    pub sell_amount: U256,
    #[serde(default)]
    pub sources: Vec<LiquiditySource>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn deserializes_a_quote_with_string_numbers() {
        let raw = r#"{
            "price": "1.001",
            "to": "0x61935cbdd02287b511119ddb11aeb42f1593b7ef",
            "data": "0xd9627aa4000000000000000000000000000000000000000000000000",
            "gas": "111000",
            "gasPrice": "5000000000",
            "value": "0",
            "buyAmount": "100012345000000000000",
            "sellAmount": "100000000000000000000",
            "sources": [
                {"name": "Uniswap_V2", "proportion": "1"},
                {"name": "Kyber", "proportion": "0"}
            ]
        }"#;

        let quote: SwapQuote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.gas, U256::from(111_000u64));
        assert_eq!(quote.gas_price, U256::from(5_000_000_000u64));
        assert_eq!(quote.value, U256::zero());
        assert_eq!(
            quote.sell_amount,
            U256::from(100u64) * U256::exp10(18)
        );
        assert_eq!(quote.sources.len(), 2);
        assert_eq!(quote.sources[0].proportion, 1.0);
        assert_eq!(
            quote.to,
            Address::from_str("0x61935cbdd02287b511119ddb11aeb42f1593b7ef").unwrap()
        );
    }

    #[test]
    fn deserializes_a_quote_with_numeric_fields() {
        let raw = r#"{
            "price": 1.001,
            "to": "0x61935cbdd02287b511119ddb11aeb42f1593b7ef",
            "data": "0xd9627aa4",
            "gas": 111000,
            "gasPrice": 5000000000,
            "value": 0,
            "buyAmount": "1000000",
            "sellAmount": "1000000"
        }"#;

        let quote: SwapQuote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.price, 1.001);
        assert_eq!(quote.gas, U256::from(111_000u64));
        assert!(quote.sources.is_empty());
    }

    #[test]
    fn hex_strings_are_accepted_for_amounts() {
        let raw = r#"{
            "price": "1",
            "to": "0x61935cbdd02287b511119ddb11aeb42f1593b7ef",
            "data": "0x",
            "gas": "0x1b198",
            "gasPrice": "0x12a05f200",
            "value": "0x0",
            "buyAmount": "1",
            "sellAmount": "1"
        }"#;

        let quote: SwapQuote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.gas, U256::from(0x1b198u64));
        assert_eq!(quote.gas_price, U256::from(0x12a05f200u64));
    }
}
