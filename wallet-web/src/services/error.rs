//! Wallet error taxonomy.
//!
//! Two kinds cover every adapter failure: [`WalletError::NotInstalled`] for
//! precondition failures (the extension's injected global is absent or does
//! not identify as the expected vendor) and [`WalletError::Connection`] for
//! everything else (user rejection, RPC failure, malformed input, unfunded
//! accounts). Adapters catch only to re-tag a cause into one of these two
//! and rethrow; they never swallow errors.
//!
//! Well-known vendor codes travel on `Connection` untouched so the consuming
//! layer can map them to user-facing text in one place ([`user_message`]).

use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, WalletError>;

/// EIP-1193 "user rejected request".
pub const CODE_USER_REJECTED: i32 = 4001;
/// JSON-RPC internal error, raised by EVM wallets on insufficient funds.
pub const CODE_INSUFFICIENT_FUNDS: i32 = -32603;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The required browser extension is absent or unidentifiable.
    #[error("{0}")]
    NotInstalled(String),

    /// The wallet is present but the operation failed; wraps the cause.
    #[error("{message}")]
    Connection { code: Option<i32>, message: String },
}

impl WalletError {
    pub fn not_installed(wallet: &str) -> Self {
        WalletError::NotInstalled(format!("{} wallet is not installed", wallet))
    }

    pub fn connection(message: impl Into<String>) -> Self {
        WalletError::Connection {
            code: None,
            message: message.into(),
        }
    }

    pub fn unknown_wallet_type(tag: &str) -> Self {
        WalletError::connection(format!("Unknown wallet type: {}", tag))
    }

    /// Re-tag a JavaScript exception, keeping its `message` and numeric
    /// `code` when present.
    pub fn from_js(err: JsValue, fallback: &str) -> Self {
        let code = js_sys::Reflect::get(&err, &JsValue::from_str("code"))
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as i32);
        let message = js_sys::Reflect::get(&err, &JsValue::from_str("message"))
            .ok()
            .and_then(|v| v.as_string())
            .or_else(|| err.as_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        WalletError::Connection { code, message }
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            WalletError::Connection { code, .. } => *code,
            WalletError::NotInstalled(_) => None,
        }
    }
}

/// Map an error to the text shown to the user, normalizing the two
/// well-known vendor codes. This runs in the consuming layer, never inside
/// an adapter, so every adapter failure goes through the same path.
pub fn user_message(err: &WalletError) -> String {
    match err.code() {
        Some(CODE_USER_REJECTED) => "Transaction rejected by user".to_string(),
        Some(CODE_INSUFFICIENT_FUNDS) => "Insufficient funds for transaction".to_string(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_installed_is_distinct_from_connection() {
        let a = WalletError::not_installed("Phantom");
        assert!(matches!(a, WalletError::NotInstalled(_)));
        assert_eq!(a.to_string(), "Phantom wallet is not installed");

        let b = WalletError::connection("boom");
        assert!(matches!(b, WalletError::Connection { .. }));
    }

    #[test]
    fn vendor_codes_are_normalized_by_the_caller() {
        let rejected = WalletError::Connection {
            code: Some(CODE_USER_REJECTED),
            message: "MetaMask Tx Signature: User denied transaction signature.".to_string(),
        };
        assert_eq!(user_message(&rejected), "Transaction rejected by user");

        let broke = WalletError::Connection {
            code: Some(CODE_INSUFFICIENT_FUNDS),
            message: "Internal JSON-RPC error.".to_string(),
        };
        assert_eq!(user_message(&broke), "Insufficient funds for transaction");
    }

    #[test]
    fn unknown_codes_keep_the_cause_message() {
        let other = WalletError::Connection {
            code: Some(-32000),
            message: "nonce too low".to_string(),
        };
        assert_eq!(user_message(&other), "nonce too low");
        assert_eq!(
            user_message(&WalletError::not_installed("Leap")),
            "Leap wallet is not installed"
        );
    }

    #[test]
    fn unknown_wallet_type_message() {
        let err = WalletError::unknown_wallet_type("trezor");
        assert_eq!(err.to_string(), "Unknown wallet type: trezor");
    }
}
