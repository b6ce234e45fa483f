use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a connected wallet, as reported by an adapter's `connect`.
///
/// `address` is in the chain's native format (0x-hex, base58, or bech32) and
/// is treated as opaque everywhere outside the adapter that produced it.
/// `balance` is a decimal string already converted from the chain's smallest
/// unit to its display unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub address: String,
    pub balance: String,
    pub chain_id: String,
    pub chain_name: String,
}

/// A broadcast-and-confirmed transfer: the chain-native hash plus the block
/// explorer link derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub tx_hash: String,
    pub explorer_url: String,
}

/// Persisted session snapshot.
///
/// Only identity and the last transaction survive a reload; transient UI
/// flags (connecting/transacting/errors) are deliberately absent from this
/// type so they can never be persisted by accident.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub address: String,
    pub balance: String,
    pub chain_id: String,
    pub chain_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
}

impl StoredSession {
    /// Build a snapshot from a freshly connected wallet.
    pub fn from_info(info: &WalletInfo, wallet_type: &str, connected_at: DateTime<Utc>) -> Self {
        Self {
            address: info.address.clone(),
            balance: info.balance.clone(),
            chain_id: info.chain_id.clone(),
            chain_name: info.chain_name.clone(),
            wallet_type: Some(wallet_type.to_string()),
            connected_at: Some(connected_at),
        }
    }

    /// A snapshot with no wallet type carries no usable identity.
    pub fn is_empty(&self) -> bool {
        self.wallet_type.is_none() || self.address.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_empty() {
        assert!(StoredSession::default().is_empty());
    }

    #[test]
    fn snapshot_carries_identity() {
        let info = WalletInfo {
            address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
            balance: "1.5".to_string(),
            chain_id: "0x1".to_string(),
            chain_name: "Ethereum Mainnet".to_string(),
        };
        let snap = StoredSession::from_info(&info, "metamask", Utc::now());
        assert!(!snap.is_empty());
        assert_eq!(snap.wallet_type.as_deref(), Some("metamask"));
        assert_eq!(snap.balance, "1.5");
    }

    #[test]
    fn transient_fields_are_not_part_of_the_snapshot() {
        // The persistence contract is the full field list: identity plus the
        // connection timestamp, nothing else.
        let json = serde_json::to_value(StoredSession::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["address", "balance", "chain_id", "chain_name"]);
    }
}
