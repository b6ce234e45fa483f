//! Rabby adapter (Ethereum family).
//!
//! Rabby injects into the same `window.ethereum` namespace as MetaMask.
//! When several extensions are active the provider exposes a `providers`
//! list; Rabby is the entry carrying `isRabby`, or the main provider itself
//! when it carries the flag.

use shared::dto::wallet::WalletInfo;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use super::evm;
use crate::services::error::{Result, WalletError};
use crate::utils::units::format_units;

const WALLET_NAME: &str = "Rabby";

#[wasm_bindgen(inline_js = "
export function rabbyProvider() {
    const eth = window.ethereum;
    if (!eth) return null;
    if (Array.isArray(eth.providers)) {
        const rabby = eth.providers.find((p) => p.isRabby);
        if (rabby) return rabby;
    }
    if (eth.isRabby) return eth;
    return null;
}
")]
extern "C" {
    fn rabbyProvider() -> Option<JsValue>;
}

fn provider() -> Result<JsValue> {
    rabbyProvider().ok_or_else(|| WalletError::not_installed(WALLET_NAME))
}

pub fn available() -> bool {
    rabbyProvider().is_some()
}

pub async fn connect() -> Result<WalletInfo> {
    let provider = provider()?;

    let address = evm::request_accounts(&provider).await?;
    let chain_id = evm::chain_id(&provider).await?;
    let wei = evm::balance_wei(&provider, &address).await?;

    Ok(WalletInfo {
        address,
        balance: format_units(wei, evm::DECIMALS, evm::DISPLAY_PLACES),
        chain_name: evm::chain_name(&chain_id),
        chain_id,
    })
}

pub async fn send(recipient: &str, amount: &str) -> Result<String> {
    let provider = provider()?;
    let wei = evm::validate_transfer(recipient, amount)?;

    let from = evm::request_accounts(&provider).await?;
    let hash = evm::send_transfer(&provider, &from, recipient, wei).await?;
    evm::wait_for_receipt(&provider, &hash).await
}

pub fn explorer_url(chain_id: &str, tx_hash: &str) -> String {
    evm::explorer_url(chain_id, tx_hash)
}

pub fn subscribe_changes(callback: &js_sys::Function) {
    if let Some(provider) = rabbyProvider() {
        evm::subscribe_changes(&provider, callback);
    }
}

pub fn unsubscribe_changes(callback: &js_sys::Function) {
    if let Some(provider) = rabbyProvider() {
        evm::unsubscribe_changes(&provider, callback);
    }
}
