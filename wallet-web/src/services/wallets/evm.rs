//! Ethereum-family provider plumbing, shared by the MetaMask and Rabby
//! adapters.
//!
//! Both extensions expose the same EIP-1193 surface (`request` plus an
//! `accountsChanged`/`chainChanged` event emitter); only provider
//! *identification* differs, so each adapter locates its own provider object
//! and hands it to the helpers here. All quantities on the wire are 0x-hex.

use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use crate::services::error::{Result, WalletError};
use crate::utils::units::parse_positive_amount;

/// Wei per ETH exponent.
pub const DECIMALS: u32 = 18;
/// Display precision for ETH balances.
pub const DISPLAY_PLACES: usize = 6;

const DEFAULT_EXPLORER: &str = "https://etherscan.io";

const CHAIN_NAMES: &[(&str, &str)] = &[
    ("0x1", "Ethereum Mainnet"),
    ("0x5", "Goerli Testnet"),
    ("0xaa36a7", "Sepolia Testnet"),
];

const CHAIN_EXPLORERS: &[(&str, &str)] = &[
    ("0x1", "https://etherscan.io"),
    ("0x5", "https://goerli.etherscan.io"),
    ("0xaa36a7", "https://sepolia.etherscan.io"),
];

#[wasm_bindgen(inline_js = "
export async function evmRequest(provider, method, params) {
    return await provider.request({ method: method, params: params });
}

export function evmOn(provider, event, callback) {
    if (provider && typeof provider.on === 'function') {
        provider.on(event, callback);
    }
}

export function evmRemoveListener(provider, event, callback) {
    if (provider && typeof provider.removeListener === 'function') {
        provider.removeListener(event, callback);
    }
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn evmRequest(provider: &JsValue, method: &str, params: JsValue)
        -> std::result::Result<JsValue, JsValue>;

    fn evmOn(provider: &JsValue, event: &str, callback: &js_sys::Function);

    fn evmRemoveListener(provider: &JsValue, event: &str, callback: &js_sys::Function);
}

#[derive(Serialize)]
struct TransferParams<'a> {
    from: &'a str,
    to: &'a str,
    value: String,
}

/// `^0x[a-fA-F0-9]{40}$`
pub fn is_eth_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate the send preconditions and convert the amount to wei. Runs
/// before any provider call.
pub fn validate_transfer(recipient: &str, amount: &str) -> Result<u128> {
    if !is_eth_address(recipient) {
        return Err(WalletError::connection("Invalid Ethereum address format"));
    }
    parse_positive_amount(amount, DECIMALS).map_err(WalletError::connection)
}

pub fn parse_hex_quantity(quantity: &str) -> Result<u128> {
    let hex = quantity.strip_prefix("0x").unwrap_or(quantity);
    if hex.is_empty() {
        return Err(WalletError::connection(format!(
            "Invalid hex quantity: {}",
            quantity
        )));
    }
    u128::from_str_radix(hex, 16)
        .map_err(|_| WalletError::connection(format!("Invalid hex quantity: {}", quantity)))
}

pub fn to_hex_quantity(value: u128) -> String {
    format!("0x{:x}", value)
}

pub fn chain_name(chain_id: &str) -> String {
    CHAIN_NAMES
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| "Unknown Network".to_string())
}

/// Block explorer link for a transaction; unknown chains fall back to the
/// mainnet explorer.
pub fn explorer_url(chain_id: &str, tx_hash: &str) -> String {
    let base = CHAIN_EXPLORERS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, url)| *url)
        .unwrap_or(DEFAULT_EXPLORER);
    format!("{}/tx/{}", base, tx_hash)
}

/// `eth_requestAccounts`: prompts the user on first use and returns the
/// active account.
pub async fn request_accounts(provider: &JsValue) -> Result<String> {
    let accounts = evmRequest(provider, "eth_requestAccounts", Array::new().into())
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to request accounts"))?;
    Array::from(&accounts)
        .get(0)
        .as_string()
        .ok_or_else(|| WalletError::connection("Wallet returned no accounts"))
}

pub async fn chain_id(provider: &JsValue) -> Result<String> {
    let id = evmRequest(provider, "eth_chainId", Array::new().into())
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to read chain id"))?;
    id.as_string()
        .map(|s| s.to_lowercase())
        .ok_or_else(|| WalletError::connection("Wallet returned no chain id"))
}

pub async fn balance_wei(provider: &JsValue, address: &str) -> Result<u128> {
    let params = Array::of2(&JsValue::from_str(address), &JsValue::from_str("latest"));
    let balance = evmRequest(provider, "eth_getBalance", params.into())
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to read balance"))?;
    let hex = balance
        .as_string()
        .ok_or_else(|| WalletError::connection("Malformed balance response"))?;
    parse_hex_quantity(&hex)
}

/// `eth_sendTransaction`: asks the wallet to sign and broadcast a plain
/// value transfer, returning the transaction hash.
pub async fn send_transfer(
    provider: &JsValue,
    from: &str,
    to: &str,
    value_wei: u128,
) -> Result<String> {
    let tx = TransferParams {
        from,
        to,
        value: to_hex_quantity(value_wei),
    };
    let tx = serde_wasm_bindgen::to_value(&tx)
        .map_err(|e| WalletError::connection(format!("Failed to encode transaction: {}", e)))?;
    let hash = evmRequest(provider, "eth_sendTransaction", Array::of1(&tx).into())
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to send transaction"))?;
    hash.as_string()
        .ok_or_else(|| WalletError::connection("Wallet returned no transaction hash"))
}

/// Poll `eth_getTransactionReceipt` until the transaction is mined. The wait
/// is bounded only by the chain itself; a reverted transaction is surfaced
/// as an error rather than a hash.
pub async fn wait_for_receipt(provider: &JsValue, tx_hash: &str) -> Result<String> {
    loop {
        let params = Array::of1(&JsValue::from_str(tx_hash));
        let receipt = evmRequest(provider, "eth_getTransactionReceipt", params.into())
            .await
            .map_err(|e| WalletError::from_js(e, "Failed to query transaction receipt"))?;

        if !receipt.is_null() && !receipt.is_undefined() {
            let status = js_sys::Reflect::get(&receipt, &JsValue::from_str("status"))
                .ok()
                .and_then(|v| v.as_string());
            if status.as_deref() == Some("0x0") {
                return Err(WalletError::connection("Transaction reverted on-chain"));
            }
            let hash = js_sys::Reflect::get(&receipt, &JsValue::from_str("transactionHash"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| tx_hash.to_string());
            return Ok(hash);
        }

        gloo_timers::future::TimeoutFuture::new(2_000).await;
    }
}

pub fn subscribe_changes(provider: &JsValue, callback: &js_sys::Function) {
    evmOn(provider, "accountsChanged", callback);
    evmOn(provider, "chainChanged", callback);
}

pub fn unsubscribe_changes(provider: &JsValue, callback: &js_sys::Function) {
    evmRemoveListener(provider, "accountsChanged", callback);
    evmRemoveListener(provider, "chainChanged", callback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_grammar() {
        assert!(is_eth_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!is_eth_address("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!is_eth_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb9226")); // 39 bytes
        assert!(!is_eth_address("0xZ39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!is_eth_address(""));
    }

    #[test]
    fn validate_transfer_rejects_before_any_network_call() {
        assert!(validate_transfer("not-an-address", "1").is_err());
        assert!(validate_transfer("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266", "0").is_err());
        assert!(validate_transfer("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266", "-1").is_err());
        assert_eq!(
            validate_transfer("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266", "1.5").unwrap(),
            1_500_000_000_000_000_000
        );
    }

    #[test]
    fn hex_quantities() {
        assert_eq!(parse_hex_quantity("0x14d1120d7b160000").unwrap(), 1_500_000_000_000_000_000);
        assert_eq!(to_hex_quantity(1_500_000_000_000_000_000), "0x14d1120d7b160000");
        assert!(parse_hex_quantity("0x").is_err());
        assert!(parse_hex_quantity("0xzz").is_err());
    }

    #[test]
    fn chain_tables() {
        assert_eq!(chain_name("0x1"), "Ethereum Mainnet");
        assert_eq!(chain_name("0xaa36a7"), "Sepolia Testnet");
        assert_eq!(chain_name("0x539"), "Unknown Network");

        assert_eq!(
            explorer_url("0xaa36a7", "0xabc"),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
        // Unknown chain ids fall back to mainnet etherscan.
        assert_eq!(explorer_url("0x539", "0xabc"), "https://etherscan.io/tx/0xabc");
    }
}
