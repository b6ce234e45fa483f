//! MetaMask adapter (Ethereum family).
//!
//! `window.ethereum` is a shared injection namespace, so presence alone is
//! not enough: the provider must identify as MetaMask, either through the
//! EIP-6963 provider list (`rdns == "io.metamask"`) or the legacy
//! `isMetaMask` flag.

use shared::dto::wallet::WalletInfo;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use super::evm;
use crate::services::error::{Result, WalletError};
use crate::utils::units::format_units;

const WALLET_NAME: &str = "MetaMask";

#[wasm_bindgen(inline_js = "
export function metamaskProvider() {
    const eth = window.ethereum;
    if (!eth) return null;
    if (Array.isArray(eth.eip6963ProviderDetails)) {
        const detail = eth.eip6963ProviderDetails.find(
            (d) => d.info && d.info.rdns === 'io.metamask'
        );
        if (detail) return detail.provider;
    }
    if (eth.isMetaMask) return eth;
    return null;
}
")]
extern "C" {
    fn metamaskProvider() -> Option<JsValue>;
}

fn provider() -> Result<JsValue> {
    metamaskProvider().ok_or_else(|| WalletError::not_installed(WALLET_NAME))
}

pub fn available() -> bool {
    metamaskProvider().is_some()
}

/// Request account access, then read the active chain and balance.
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

/// Sign and broadcast a plain ETH transfer, blocking until it is mined.
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
    if let Some(provider) = metamaskProvider() {
        evm::subscribe_changes(&provider, callback);
    }
}

pub fn unsubscribe_changes(callback: &js_sys::Function) {
    if let Some(provider) = metamaskProvider() {
        evm::unsubscribe_changes(&provider, callback);
    }
}
