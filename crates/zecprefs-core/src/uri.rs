//! `zcash:` payment URI parsing.
//!
//! Format: `zcash:<address>[?key=value&key=value...]`. Keys are matched
//! case-insensitively; `amt`/`amount` carry a decimal amount and
//! `memo`/`message`/`msg` a percent-encoded memo. Other keys are ignored since
//! some wallets use them to pass extra data.

use serde::{Deserialize, Serialize};

use crate::address::is_valid_address;
use crate::amount::{AmountError, parse_user_string, to_display_string};
use crate::types::{DECIMAL_PLACES, NetworkMode};

/// Scheme prefix every payment URI must start with.
pub const URI_SCHEME: &str = "zcash:";

/// Payment URI parsing error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentUriError {
    #[error("Not a zcash payment URI")]
    MissingScheme,
    #[error("Couldn't find an address")]
    MissingAddress,
    #[error("Could not understand address")]
    InvalidAddress { address: String },
    #[error("Unexpected text after the address")]
    UnexpectedText,
    #[error("No value argument was seen")]
    MissingValue { segment: String },
    #[error("Invalid amount: {0}")]
    InvalidAmount(AmountError),
    #[error("Invalid amount: amount cannot be negative")]
    NegativeAmount,
    #[error("Could not decode memo")]
    InvalidMemo,
}

/// A parsed payment request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentUri {
    /// Recipient address, already validated for the network it was parsed on.
    pub address: String,
    /// Requested amount as the decimal string found in the URI.
    pub amount: Option<String>,
    /// Decoded memo text.
    pub memo: Option<String>,
}

impl PaymentUri {
    /// Parse a payment URI, validating the address against `mode`.
    pub fn parse(mode: NetworkMode, text: &str) -> Result<Self, PaymentUriError> {
        let rest = text
            .strip_prefix(URI_SCHEME)
            .ok_or(PaymentUriError::MissingScheme)?;

        let end = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(PaymentUriError::MissingAddress);
        }

        let (address, rest) = rest.split_at(end);
        if !is_valid_address(mode, address) {
            return Err(PaymentUriError::InvalidAddress {
                address: address.to_string(),
            });
        }

        let mut uri = PaymentUri {
            address: address.to_string(),
            ..Default::default()
        };
        if rest.is_empty() {
            return Ok(uri);
        }

        let query = rest
            .strip_prefix('?')
            .ok_or(PaymentUriError::UnexpectedText)?;

        for segment in query.split('&') {
            let mut kv = segment.split('=');
            let (key, value) = match (kv.next(), kv.next(), kv.next()) {
                (Some(key), Some(value), None) => (key, value),
                _ => {
                    return Err(PaymentUriError::MissingValue {
                        segment: segment.to_string(),
                    });
                }
            };

            match key.to_ascii_lowercase().as_str() {
                "amt" | "amount" => {
                    let zats = parse_user_string(value, DECIMAL_PLACES)
                        .map_err(PaymentUriError::InvalidAmount)?;
                    if zats < 0 {
                        return Err(PaymentUriError::NegativeAmount);
                    }
                    uri.amount = Some(value.to_string());
                }
                "memo" | "message" | "msg" => {
                    let memo =
                        urlencoding::decode(value).map_err(|_| PaymentUriError::InvalidMemo)?;
                    uri.memo = Some(memo.into_owned());
                }
                other => {
                    tracing::debug!(key = other, "Ignoring unknown payment URI parameter");
                }
            }
        }

        Ok(uri)
    }

    /// Amount in base units, zero when the URI carried none.
    pub fn amount_zats(&self) -> Result<i64, AmountError> {
        match &self.amount {
            Some(amount) => parse_user_string(amount, DECIMAL_PLACES),
            None => Ok(0),
        }
    }

    /// Human-readable summary shown before paying.
    pub fn pretty(&self, token: &str) -> String {
        let amount = match self.amount_zats() {
            Ok(zats) => to_display_string(zats, DECIMAL_PLACES),
            Err(_) => self.amount.clone().unwrap_or_default(),
        };
        format!(
            "Payment Request\nPay: {}\nAmount: {} {}\nMemo: {}",
            self.address,
            amount,
            token,
            self.memo.as_deref().unwrap_or_default()
        )
    }

    /// Render back into URI form, percent-encoding the memo.
    pub fn to_uri_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(amount) = &self.amount {
            params.push(format!("amount={}", amount));
        }
        if let Some(memo) = &self.memo {
            params.push(format!("memo={}", urlencoding::encode(memo)));
        }

        if params.is_empty() {
            format!("{}{}", URI_SCHEME, self.address)
        } else {
            format!("{}{}?{}", URI_SCHEME, self.address, params.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const T_ADDR: &str = "t1XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX";

    fn sapling_testnet() -> String {
        format!("ztestsapling{}", "x".repeat(76))
    }

    #[test]
    fn test_parse_address_amount_memo() {
        let uri = PaymentUri::parse(
            NetworkMode::Mainnet,
            &format!("zcash:{}?amt=1.5&memo=hi", T_ADDR),
        )
        .unwrap();
        assert_eq!(uri.address, T_ADDR);
        assert_eq!(uri.amount.as_deref(), Some("1.5"));
        assert_eq!(uri.memo.as_deref(), Some("hi"));
    }

    #[test]
    fn test_parse_address_only() {
        let uri = PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}", T_ADDR)).unwrap();
        assert_eq!(uri.address, T_ADDR);
        assert_eq!(uri.amount, None);
        assert_eq!(uri.memo, None);
    }

    #[test]
    fn test_parse_missing_scheme() {
        let err = PaymentUri::parse(NetworkMode::Mainnet, T_ADDR).unwrap_err();
        assert_eq!(err, PaymentUriError::MissingScheme);
        assert!(!err.to_string().is_empty());

        let err = PaymentUri::parse(NetworkMode::Mainnet, &format!("bitcoin:{}", T_ADDR));
        assert_eq!(err, Err(PaymentUriError::MissingScheme));
    }

    #[test]
    fn test_parse_missing_address() {
        assert_eq!(
            PaymentUri::parse(NetworkMode::Mainnet, "zcash:"),
            Err(PaymentUriError::MissingAddress)
        );
        assert_eq!(
            PaymentUri::parse(NetworkMode::Mainnet, "zcash:?amt=1"),
            Err(PaymentUriError::MissingAddress)
        );
    }

    #[test]
    fn test_parse_invalid_address() {
        let err = PaymentUri::parse(NetworkMode::Mainnet, "zcash:t1short?amt=1").unwrap_err();
        assert_eq!(
            err,
            PaymentUriError::InvalidAddress {
                address: "t1short".to_string()
            }
        );
        assert_eq!(err.to_string(), "Could not understand address");
    }

    #[test]
    fn test_parse_testnet_address_depends_on_mode() {
        let text = format!("zcash:{}", sapling_testnet());
        assert!(PaymentUri::parse(NetworkMode::Testnet, &text).is_ok());
        assert!(matches!(
            PaymentUri::parse(NetworkMode::Mainnet, &text),
            Err(PaymentUriError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_parse_segment_without_value() {
        let err = PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}?amt", T_ADDR))
            .unwrap_err();
        assert_eq!(
            err,
            PaymentUriError::MissingValue {
                segment: "amt".to_string()
            }
        );
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_parse_segment_with_two_equals() {
        let err = PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}?memo=a=b", T_ADDR));
        assert!(matches!(err, Err(PaymentUriError::MissingValue { .. })));
    }

    #[test]
    fn test_parse_empty_query() {
        let err = PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}?", T_ADDR));
        assert!(matches!(err, Err(PaymentUriError::MissingValue { .. })));
    }

    #[test]
    fn test_parse_unexpected_text_after_address() {
        let err = PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}/amt=1", T_ADDR));
        assert_eq!(err, Err(PaymentUriError::UnexpectedText));
    }

    #[test]
    fn test_parse_keys_case_insensitive() {
        let uri = PaymentUri::parse(
            NetworkMode::Mainnet,
            &format!("zcash:{}?AMOUNT=2&Message=thanks", T_ADDR),
        )
        .unwrap();
        assert_eq!(uri.amount.as_deref(), Some("2"));
        assert_eq!(uri.memo.as_deref(), Some("thanks"));

        let uri =
            PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}?MSG=x", T_ADDR)).unwrap();
        assert_eq!(uri.memo.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let uri = PaymentUri::parse(
            NetworkMode::Mainnet,
            &format!("zcash:{}?label=shop&amt=0.1&extra=1", T_ADDR),
        )
        .unwrap();
        assert_eq!(uri.amount.as_deref(), Some("0.1"));
        assert_eq!(uri.memo, None);
    }

    #[test]
    fn test_parse_memo_percent_decoded() {
        let uri = PaymentUri::parse(
            NetworkMode::Mainnet,
            &format!("zcash:{}?memo=Thank%20you%21%20%E2%9C%93", T_ADDR),
        )
        .unwrap();
        assert_eq!(uri.memo.as_deref(), Some("Thank you! ✓"));
    }

    #[test]
    fn test_parse_memo_invalid_utf8() {
        let err = PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}?memo=%FF", T_ADDR));
        assert_eq!(err, Err(PaymentUriError::InvalidMemo));
    }

    #[test]
    fn test_parse_invalid_amount() {
        let err = PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}?amt=abc", T_ADDR));
        assert_eq!(
            err,
            Err(PaymentUriError::InvalidAmount(AmountError::InvalidCharacter('a')))
        );

        let err = PaymentUri::parse(NetworkMode::Mainnet, &format!("zcash:{}?amt=-1", T_ADDR));
        assert_eq!(err, Err(PaymentUriError::NegativeAmount));
    }

    #[test]
    fn test_amount_zats() {
        let uri = PaymentUri {
            address: T_ADDR.to_string(),
            amount: Some("1.5".to_string()),
            memo: None,
        };
        assert_eq!(uri.amount_zats(), Ok(150_000_000));
        assert_eq!(PaymentUri::default().amount_zats(), Ok(0));
    }

    #[test]
    fn test_pretty() {
        let uri = PaymentUri {
            address: T_ADDR.to_string(),
            amount: Some("1.5".to_string()),
            memo: Some("lunch".to_string()),
        };
        assert_eq!(
            uri.pretty("ZEC"),
            format!(
                "Payment Request\nPay: {}\nAmount: 1.50000000 ZEC\nMemo: lunch",
                T_ADDR
            )
        );
    }

    #[test]
    fn test_to_uri_string_roundtrip() {
        let uri = PaymentUri {
            address: T_ADDR.to_string(),
            amount: Some("0.25".to_string()),
            memo: Some("rent & bills".to_string()),
        };
        let text = uri.to_uri_string();
        assert_eq!(
            text,
            format!("zcash:{}?amount=0.25&memo=rent%20%26%20bills", T_ADDR)
        );
        assert_eq!(PaymentUri::parse(NetworkMode::Mainnet, &text), Ok(uri));
    }

    #[test]
    fn test_to_uri_string_address_only() {
        let uri = PaymentUri {
            address: T_ADDR.to_string(),
            ..Default::default()
        };
        assert_eq!(uri.to_uri_string(), format!("zcash:{}", T_ADDR));
    }

    proptest! {
        #[test]
        fn test_parse_never_panics(text in "zcash:\\PC{0,64}") {
            let _ = PaymentUri::parse(NetworkMode::Mainnet, &text);
        }
    }
}
