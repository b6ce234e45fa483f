//! Wallet session state.
//!
//! [`WalletSession`] is a plain value with every transition expressed as a
//! method, so the lifecycle is testable without a browser; [`WalletContext`]
//! wraps it in a reactive signal and is the single entry point through which
//! pages apply adapter results. Nothing outside this module writes the
//! session, and persistence happens on the same transitions that change
//! identity, so storage can never disagree with the signal.

use chrono::Utc;
use leptos::prelude::*;

use shared::dto::wallet::{StoredSession, TransactionResult, WalletInfo};

use crate::services::wallets::WalletKind;
use crate::state::storage;

/// A successfully connected wallet: the adapter tag and its output travel
/// together, so the tag can never be set without a `WalletInfo` behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedWallet {
    pub kind: WalletKind,
    pub info: WalletInfo,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletSession {
    pub connected: Option<ConnectedWallet>,
    pub last_tx: Option<TransactionResult>,
    pub is_connecting: bool,
    pub is_transacting: bool,
    pub is_refreshing: bool,
    pub error: Option<String>,
    pub transaction_error: Option<String>,
}

impl WalletSession {
    pub fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    pub fn kind(&self) -> Option<WalletKind> {
        self.connected.as_ref().map(|c| c.kind)
    }

    pub fn address(&self) -> Option<String> {
        self.connected.as_ref().map(|c| c.info.address.clone())
    }

    pub fn chain_id(&self) -> Option<String> {
        self.connected.as_ref().map(|c| c.info.chain_id.clone())
    }

    pub fn begin_connect(&mut self) {
        self.is_connecting = true;
        self.error = None;
    }

    pub fn complete_connect(&mut self, kind: WalletKind, info: WalletInfo) {
        self.connected = Some(ConnectedWallet { kind, info });
        self.is_connecting = false;
        self.error = None;
    }

    /// Any adapter error during initial connect clears the whole session;
    /// only the error text survives.
    pub fn fail_connect(&mut self, message: String) {
        *self = WalletSession {
            error: Some(message),
            ..WalletSession::default()
        };
    }

    /// Claim the refresh slot. Refreshes arriving while another refresh or a
    /// send is outstanding are dropped, not queued.
    pub fn begin_refresh(&mut self) -> bool {
        if self.is_refreshing || self.is_transacting {
            return false;
        }
        self.is_refreshing = true;
        true
    }

    /// Re-read identity in place: address, balance, and chain may all have
    /// changed under us.
    pub fn complete_refresh(&mut self, kind: WalletKind, info: WalletInfo) {
        self.connected = Some(ConnectedWallet { kind, info });
        self.is_refreshing = false;
    }

    pub fn fail_refresh(&mut self) {
        self.is_refreshing = false;
    }

    pub fn begin_send(&mut self) {
        self.is_transacting = true;
        self.transaction_error = None;
    }

    pub fn complete_send(&mut self, tx: TransactionResult) {
        self.last_tx = Some(tx);
        self.is_transacting = false;
        self.transaction_error = None;
    }

    /// A failed send leaves the connection and balance untouched.
    pub fn fail_send(&mut self, message: String) {
        self.is_transacting = false;
        self.transaction_error = Some(message);
    }

    pub fn reset(&mut self) {
        *self = WalletSession::default();
    }
}

/// Rebuild a session from its persisted snapshot. Snapshots carrying an
/// unknown wallet tag (older builds, hand-edited storage) are dropped.
fn restore_session(snapshot: StoredSession, last_tx: Option<TransactionResult>) -> WalletSession {
    let connected = snapshot
        .wallet_type
        .as_deref()
        .and_then(|tag| tag.parse::<WalletKind>().ok())
        .map(|kind| ConnectedWallet {
            kind,
            info: WalletInfo {
                address: snapshot.address,
                balance: snapshot.balance,
                chain_id: snapshot.chain_id,
                chain_name: snapshot.chain_name,
            },
        });
    WalletSession {
        last_tx: if connected.is_some() { last_tx } else { None },
        connected,
        ..WalletSession::default()
    }
}

/// Reactive handle shared through the Leptos context tree.
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub session: RwSignal<WalletSession>,
}

impl WalletContext {
    pub fn new() -> Self {
        let session = match storage::load_session() {
            Some(snapshot) => restore_session(snapshot, storage::load_last_tx()),
            None => WalletSession::default(),
        };
        Self {
            session: RwSignal::new(session),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.with(|s| s.is_connected())
    }

    pub fn kind(&self) -> Option<WalletKind> {
        self.session.with(|s| s.kind())
    }

    pub fn address(&self) -> Option<String> {
        self.session.with(|s| s.address())
    }

    pub fn chain_id(&self) -> Option<String> {
        self.session.with(|s| s.chain_id())
    }

    pub fn begin_connect(&self) {
        self.session.update(|s| s.begin_connect());
    }

    pub fn complete_connect(&self, kind: WalletKind, info: WalletInfo) {
        storage::save_session(&StoredSession::from_info(&info, kind.as_str(), Utc::now()));
        self.session.update(|s| s.complete_connect(kind, info));
    }

    pub fn fail_connect(&self, message: String) {
        storage::clear();
        self.session.update(|s| s.fail_connect(message));
    }

    pub fn begin_refresh(&self) -> bool {
        let mut claimed = false;
        self.session.update(|s| claimed = s.begin_refresh());
        claimed
    }

    pub fn complete_refresh(&self, kind: WalletKind, info: WalletInfo) {
        storage::save_session(&StoredSession::from_info(&info, kind.as_str(), Utc::now()));
        self.session.update(|s| s.complete_refresh(kind, info));
    }

    pub fn fail_refresh(&self) {
        self.session.update(|s| s.fail_refresh());
    }

    pub fn begin_send(&self) {
        self.session.update(|s| s.begin_send());
    }

    pub fn complete_send(&self, tx: TransactionResult) {
        storage::save_last_tx(&tx);
        self.session.update(|s| s.complete_send(tx));
    }

    pub fn fail_send(&self, message: String) {
        self.session.update(|s| s.fail_send(message));
    }

    pub fn disconnect(&self) {
        storage::clear();
        self.session.update(|s| s.reset());
    }
}

pub fn provide_wallet_context() -> WalletContext {
    let context = WalletContext::new();
    provide_context(context);
    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> WalletInfo {
        WalletInfo {
            address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
            balance: "1.5".to_string(),
            chain_id: "0x1".to_string(),
            chain_name: "Ethereum Mainnet".to_string(),
        }
    }

    #[test]
    fn connect_lifecycle() {
        let mut s = WalletSession::default();
        s.begin_connect();
        assert!(s.is_connecting);

        s.complete_connect(WalletKind::Metamask, info());
        assert!(!s.is_connecting);
        assert!(s.is_connected());
        assert_eq!(s.kind(), Some(WalletKind::Metamask));
    }

    #[test]
    fn failed_connect_clears_everything_but_the_error() {
        let mut s = WalletSession::default();
        s.complete_connect(WalletKind::Phantom, info());
        s.begin_connect();
        s.fail_connect("Phantom wallet is not installed".to_string());

        assert!(!s.is_connected());
        assert!(!s.is_connecting);
        assert_eq!(s.kind(), None);
        assert_eq!(s.error.as_deref(), Some("Phantom wallet is not installed"));
    }

    #[test]
    fn reset_restores_the_empty_initial_state() {
        let mut s = WalletSession::default();
        s.complete_connect(WalletKind::Petra, info());
        s.begin_send();
        s.complete_send(TransactionResult {
            tx_hash: "0xabc".to_string(),
            explorer_url: "https://explorer.aptoslabs.com/txn/0xabc?network=testnet".to_string(),
        });
        s.begin_refresh();
        s.transaction_error = Some("boom".to_string());

        s.reset();
        assert_eq!(s, WalletSession::default());
    }

    #[test]
    fn refresh_slot_is_exclusive() {
        let mut s = WalletSession::default();
        s.complete_connect(WalletKind::Leap, info());

        assert!(s.begin_refresh());
        // A second refresh while one is outstanding is dropped.
        assert!(!s.begin_refresh());
        s.complete_refresh(WalletKind::Leap, info());
        assert!(!s.is_refreshing);

        // Refreshes are also dropped while a send is in flight.
        s.begin_send();
        assert!(!s.begin_refresh());
        s.fail_send("rejected".to_string());
        assert!(s.begin_refresh());
    }

    #[test]
    fn failed_send_keeps_the_connection() {
        let mut s = WalletSession::default();
        s.complete_connect(WalletKind::Metamask, info());
        s.begin_send();
        s.fail_send("Insufficient funds for transaction".to_string());

        assert!(s.is_connected());
        assert!(!s.is_transacting);
        assert_eq!(
            s.transaction_error.as_deref(),
            Some("Insufficient funds for transaction")
        );
        assert_eq!(s.last_tx, None);
    }

    #[test]
    fn restore_rebuilds_identity_and_drops_unknown_tags() {
        let snapshot = StoredSession::from_info(&info(), "metamask", Utc::now());
        let tx = TransactionResult {
            tx_hash: "0xabc".to_string(),
            explorer_url: "https://etherscan.io/tx/0xabc".to_string(),
        };
        let restored = restore_session(snapshot, Some(tx.clone()));
        assert_eq!(restored.kind(), Some(WalletKind::Metamask));
        assert_eq!(restored.last_tx, Some(tx.clone()));
        assert!(!restored.is_connecting && !restored.is_transacting);

        let stale = StoredSession {
            wallet_type: Some("trustwallet".to_string()),
            ..StoredSession::from_info(&info(), "trustwallet", Utc::now())
        };
        let restored = restore_session(stale, Some(tx));
        assert!(!restored.is_connected());
        assert_eq!(restored.last_tx, None);
    }
}
