//! # Shared Utility Functions
//!
//! Display helpers for wallet addresses.
//!
//! Every address format this project handles (0x-hex for Ethereum-family
//! chains, base58 for Solana, plain hex for Aptos, bech32 for Cosmos) is
//! ASCII-only, so byte slicing is safe here.
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "8W6QginkhTTxoP2deQjq7rZ9YMwN5FH9JYuLfSKuJKAL";
//! assert_eq!(format_address(address, 4, 4), "8W6Q...JKAL");
//! ```

/// Format a wallet address by showing the first `prefix_len` and last
/// `suffix_len` characters with an ellipsis in between.
///
/// Addresses too short to truncate meaningfully are returned unchanged.
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// [`format_address`] with the 6/4 split used across the UI.
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        let addr = "8W6QginkhTTxoP2deQjq7rZ9YMwN5FH9JYuLfSKuJKAL";
        assert_eq!(format_address(addr, 4, 4), "8W6Q...JKAL");
        assert_eq!(format_address(addr, 6, 6), "8W6Qgi...uJKAL");
    }

    #[test]
    fn test_format_address_other_chains() {
        let eth = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        assert_eq!(format_address(eth, 6, 4), "0xf39F...2266");

        let cosmos = "cosmos1vqpjljwsynsn58dugz0w8ut7kun7t8ls2qkmsq";
        assert_eq!(format_address(cosmos, 9, 4), "cosmos1vq...kmsq");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("short", 4, 4), "short");
        assert_eq!(format_address("abc", 4, 4), "abc");
    }

    #[test]
    fn test_truncate_address() {
        let addr = "8W6QginkhTTxoP2deQjq7rZ9YMwN5FH9JYuLfSKuJKAL";
        assert_eq!(truncate_address(addr), "8W6Qgi...JKAL");
    }
}
