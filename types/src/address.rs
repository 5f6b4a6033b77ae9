//! Wallet address handed to the client by the wallet provider.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// The address of a connected wallet.
///
/// The client never interprets the address beyond requiring it to be a
/// single non-empty token; the poll service performs the real validation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Number of characters kept on each side by [`WalletAddress::truncated`].
    const TRUNCATE_KEEP: usize = 4;

    /// Parse an address, trimming surrounding whitespace.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyAddress);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TypesError::AddressWhitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for headers and status lines: `GdXp...4yMX`.
    ///
    /// Addresses too short to benefit from truncation are returned whole.
    pub fn truncated(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= Self::TRUNCATE_KEEP * 2 + 3 {
            return self.0.clone();
        }
        let head: String = chars[..Self::TRUNCATE_KEEP].iter().collect();
        let tail: String = chars[chars.len() - Self::TRUNCATE_KEEP..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let addr = WalletAddress::parse("  GdXpvGV9Xc5p83qwqoSc2Z6FxhiPJXMSD8ACKq4a4yMX \n").unwrap();
        assert_eq!(addr.as_str(), "GdXpvGV9Xc5p83qwqoSc2Z6FxhiPJXMSD8ACKq4a4yMX");
    }

    #[test]
    fn parse_rejects_empty_and_inner_whitespace() {
        assert_eq!(WalletAddress::parse("   "), Err(TypesError::EmptyAddress));
        assert!(matches!(
            WalletAddress::parse("abc def"),
            Err(TypesError::AddressWhitespace(_))
        ));
    }

    #[test]
    fn truncated_keeps_four_chars_each_side() {
        let addr = WalletAddress::parse("GdXpvGV9Xc5p83qwqoSc2Z6FxhiPJXMSD8ACKq4a4yMX").unwrap();
        assert_eq!(addr.truncated(), "GdXp...4yMX");
    }

    #[test]
    fn short_address_is_not_truncated() {
        let addr = WalletAddress::parse("abcdefghij").unwrap();
        assert_eq!(addr.truncated(), "abcdefghij");
    }

    #[test]
    fn deserialize_rejects_empty_string() {
        assert!(serde_json::from_str::<WalletAddress>("\"\"").is_err());
        let addr: WalletAddress = serde_json::from_str("\"addr1\"").unwrap();
        assert_eq!(addr.as_str(), "addr1");
    }
}
