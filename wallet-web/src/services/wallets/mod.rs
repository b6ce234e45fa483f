//! Wallet adapters for the supported browser extensions.
//!
//! Every adapter implements the same three-operation contract, and this
//! module is the single call site that routes a [`WalletKind`] tag to the
//! matching implementation:
//!
//! - `connect()`: request account access from the extension (may prompt the
//!   user), read the active chain id, read the native balance converted to
//!   display units. Raises [`WalletError::NotInstalled`] when the extension
//!   is absent or unidentifiable, [`WalletError::Connection`] for anything
//!   else.
//! - `send(recipient, amount)`: validate locally, convert the amount to the
//!   chain's smallest unit, ask the extension to sign and broadcast, and
//!   block until the transfer is confirmed. Returns the chain-native hash.
//! - `explorer_url(chain_id, tx_hash)`: pure lookup producing a block
//!   explorer link, total over any input.
//!
//! Adding a chain means adding one variant, one adapter module, and the
//! match arms below; existing adapters are never branched on a new chain.

pub mod evm;
pub mod leap;
pub mod metamask;
pub mod petra;
pub mod phantom;
pub mod rabby;

use std::str::FromStr;

use shared::dto::wallet::WalletInfo;

use crate::services::error::{Result, WalletError};

/// The closed set of supported wallets. The tag strings below appear in the
/// `?type=` URL parameter and in persisted sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletKind {
    Metamask,
    Rabby,
    Phantom,
    Petra,
    Leap,
}

impl WalletKind {
    pub const ALL: [WalletKind; 5] = [
        WalletKind::Metamask,
        WalletKind::Rabby,
        WalletKind::Phantom,
        WalletKind::Petra,
        WalletKind::Leap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::Metamask => "metamask",
            WalletKind::Rabby => "rabby",
            WalletKind::Phantom => "phantom",
            WalletKind::Petra => "petra",
            WalletKind::Leap => "leap",
        }
    }

    /// Vendor name shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            WalletKind::Metamask => "MetaMask",
            WalletKind::Rabby => "Rabby",
            WalletKind::Phantom => "Phantom",
            WalletKind::Petra => "Petra",
            WalletKind::Leap => "Leap",
        }
    }

    /// Native asset ticker of the wallet's chain.
    pub fn symbol(&self) -> &'static str {
        match self {
            WalletKind::Metamask | WalletKind::Rabby => "ETH",
            WalletKind::Phantom => "SOL",
            WalletKind::Petra => "APT",
            WalletKind::Leap => "ATOM",
        }
    }
}

impl FromStr for WalletKind {
    type Err = WalletError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "metamask" => Ok(WalletKind::Metamask),
            "rabby" => Ok(WalletKind::Rabby),
            "phantom" => Ok(WalletKind::Phantom),
            "petra" => Ok(WalletKind::Petra),
            "leap" => Ok(WalletKind::Leap),
            other => Err(WalletError::unknown_wallet_type(other)),
        }
    }
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the extension for `kind` is present and identifiable right now.
pub fn available(kind: WalletKind) -> bool {
    match kind {
        WalletKind::Metamask => metamask::available(),
        WalletKind::Rabby => rabby::available(),
        WalletKind::Phantom => phantom::available(),
        WalletKind::Petra => petra::available(),
        WalletKind::Leap => leap::available(),
    }
}

pub async fn connect(kind: WalletKind) -> Result<WalletInfo> {
    match kind {
        WalletKind::Metamask => metamask::connect().await,
        WalletKind::Rabby => rabby::connect().await,
        WalletKind::Phantom => phantom::connect().await,
        WalletKind::Petra => petra::connect().await,
        WalletKind::Leap => leap::connect().await,
    }
}

pub async fn send(kind: WalletKind, recipient: &str, amount: &str) -> Result<String> {
    match kind {
        WalletKind::Metamask => metamask::send(recipient, amount).await,
        WalletKind::Rabby => rabby::send(recipient, amount).await,
        WalletKind::Phantom => phantom::send(recipient, amount).await,
        WalletKind::Petra => petra::send(recipient, amount).await,
        WalletKind::Leap => leap::send(recipient, amount).await,
    }
}

pub fn explorer_url(kind: WalletKind, chain_id: &str, tx_hash: &str) -> String {
    match kind {
        WalletKind::Metamask => metamask::explorer_url(chain_id, tx_hash),
        WalletKind::Rabby => rabby::explorer_url(chain_id, tx_hash),
        WalletKind::Phantom => phantom::explorer_url(chain_id, tx_hash),
        WalletKind::Petra => petra::explorer_url(chain_id, tx_hash),
        WalletKind::Leap => leap::explorer_url(chain_id, tx_hash),
    }
}

/// Forward wallet-originated account/network change notifications to
/// `callback`. Leap exposes no change events, so its arm is a no-op.
pub fn subscribe_changes(kind: WalletKind, callback: &js_sys::Function) {
    match kind {
        WalletKind::Metamask => metamask::subscribe_changes(callback),
        WalletKind::Rabby => rabby::subscribe_changes(callback),
        WalletKind::Phantom => phantom::subscribe_changes(callback),
        WalletKind::Petra => petra::subscribe_changes(callback),
        WalletKind::Leap => {}
    }
}

pub fn unsubscribe_changes(kind: WalletKind, callback: &js_sys::Function) {
    match kind {
        WalletKind::Metamask => metamask::unsubscribe_changes(callback),
        WalletKind::Rabby => rabby::unsubscribe_changes(callback),
        WalletKind::Phantom => phantom::unsubscribe_changes(callback),
        WalletKind::Petra => petra::unsubscribe_changes(callback),
        WalletKind::Leap => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in WalletKind::ALL {
            assert_eq!(kind.as_str().parse::<WalletKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag_is_rejected_before_any_adapter_runs() {
        let err = "trustwallet".parse::<WalletKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown wallet type: trustwallet");
        assert!("".parse::<WalletKind>().is_err());
        // Tags are case-sensitive, as in the URL parameter.
        assert!("MetaMask".parse::<WalletKind>().is_err());
    }

    #[test]
    fn symbols_match_chains() {
        assert_eq!(WalletKind::Metamask.symbol(), "ETH");
        assert_eq!(WalletKind::Rabby.symbol(), "ETH");
        assert_eq!(WalletKind::Phantom.symbol(), "SOL");
        assert_eq!(WalletKind::Petra.symbol(), "APT");
        assert_eq!(WalletKind::Leap.symbol(), "ATOM");
    }

    #[test]
    fn explorer_dispatch_is_total() {
        // Every variant resolves, even with a chain id no table contains.
        for kind in WalletKind::ALL {
            let url = explorer_url(kind, "bogus-chain", "HASH");
            assert!(url.starts_with("https://"));
            assert!(url.contains("HASH"));
        }
    }
}
