//! Petra adapter (Aptos).
//!
//! `window.aptos` handles account access and `signAndSubmitTransaction`;
//! balance reads and confirmation polling go through the testnet fullnode
//! REST API. The app pins the testnet network (id `"2"`).

use serde::Deserialize;
use shared::dto::wallet::WalletInfo;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use crate::services::error::{Result, WalletError};
use crate::utils::units::{format_units, parse_positive_amount};

const WALLET_NAME: &str = "Petra";

/// Octas per APT exponent.
const DECIMALS: u32 = 8;
const DISPLAY_PLACES: usize = 6;

/// Network the app operates on (Aptos testnet).
const NETWORK_ID: &str = "2";

const FULLNODE: &str = "https://fullnode.testnet.aptoslabs.com/v1";
const COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

const EXPLORER_BASE: &str = "https://explorer.aptoslabs.com";

const CHAIN_NAMES: &[(&str, &str)] = &[
    ("1", "Aptos Mainnet"),
    ("2", "Aptos Testnet"),
    ("3", "Aptos Devnet"),
];

#[wasm_bindgen(inline_js = "
export function petraAvailable() {
    return typeof window.aptos !== 'undefined';
}

export async function petraConnect() {
    await window.aptos.connect();
    const account = await window.aptos.account();
    if (!account || !account.address) {
        throw new Error('Failed to get account address');
    }
    return account.address;
}

export async function petraSubmitTransfer(recipient, octas) {
    const payload = {
        type: 'entry_function_payload',
        function: '0x1::coin::transfer',
        type_arguments: ['0x1::aptos_coin::AptosCoin'],
        arguments: [recipient, octas],
    };
    const pending = await window.aptos.signAndSubmitTransaction(payload);
    return pending.hash;
}

export function petraOnChange(callback) {
    if (!window.aptos) return;
    if (typeof window.aptos.onAccountChange === 'function') {
        window.aptos.onAccountChange(callback);
    }
    if (typeof window.aptos.onNetworkChange === 'function') {
        window.aptos.onNetworkChange(callback);
    }
}

export function petraRemoveListener(event, callback) {
    if (window.aptos && typeof window.aptos.removeListener === 'function') {
        window.aptos.removeListener(event, callback);
    }
}
")]
extern "C" {
    fn petraAvailable() -> bool;

    #[wasm_bindgen(catch)]
    async fn petraConnect() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn petraSubmitTransfer(
        recipient: &str,
        octas: &str,
    ) -> std::result::Result<JsValue, JsValue>;

    fn petraOnChange(callback: &js_sys::Function);

    fn petraRemoveListener(event: &str, callback: &js_sys::Function);
}

#[derive(Deserialize)]
struct CoinStoreResource {
    data: CoinStoreData,
}

#[derive(Deserialize)]
struct CoinStoreData {
    coin: CoinValue,
}

#[derive(Deserialize)]
struct CoinValue {
    value: String,
}

#[derive(Deserialize)]
struct TransactionStatus {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
}

pub fn available() -> bool {
    petraAvailable()
}

async fn balance_octas(address: &str) -> Result<u128> {
    let url = format!(
        "{}/accounts/{}/resource/{}",
        FULLNODE,
        address,
        urlencoding::encode(COIN_STORE)
    );
    let response = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| WalletError::connection(format!("Balance query failed: {}", e)))?;

    if !response.ok() {
        return Err(WalletError::connection(format!(
            "Failed to read coin store (HTTP {})",
            response.status()
        )));
    }

    let resource: CoinStoreResource = response
        .json()
        .await
        .map_err(|e| WalletError::connection(format!("Malformed coin store response: {}", e)))?;

    resource
        .data
        .coin
        .value
        .parse()
        .map_err(|_| WalletError::connection("Failed to parse balance value"))
}

/// Poll the fullnode until the transaction leaves the pending state. A
/// transaction that executed with `success: false` is surfaced as an error.
async fn wait_for_transaction(tx_hash: &str) -> Result<()> {
    let url = format!("{}/transactions/by_hash/{}", FULLNODE, tx_hash);
    loop {
        let response = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| WalletError::connection(format!("Confirmation query failed: {}", e)))?;

        // 404 means the fullnode has not indexed the transaction yet.
        if response.ok() {
            let status: TransactionStatus = response.json().await.map_err(|e| {
                WalletError::connection(format!("Malformed transaction response: {}", e))
            })?;
            if status.kind != "pending_transaction" {
                return match status.success {
                    Some(true) | None => Ok(()),
                    Some(false) => Err(WalletError::connection(
                        status
                            .vm_status
                            .unwrap_or_else(|| "Transaction failed on-chain".to_string()),
                    )),
                };
            }
        }

        gloo_timers::future::TimeoutFuture::new(1_000).await;
    }
}

pub async fn connect() -> Result<WalletInfo> {
    if !petraAvailable() {
        return Err(WalletError::not_installed(WALLET_NAME));
    }

    let address = petraConnect()
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to connect to Petra wallet"))?
        .as_string()
        .ok_or_else(|| WalletError::connection("Failed to get account address"))?;

    let octas = balance_octas(&address).await?;

    Ok(WalletInfo {
        address,
        balance: format_units(octas, DECIMALS, DISPLAY_PLACES),
        chain_id: NETWORK_ID.to_string(),
        chain_name: chain_name(NETWORK_ID),
    })
}

/// Submit a typed `0x1::coin::transfer` call and block until the fullnode
/// reports it executed. Recipient validation is the wallet's job.
pub async fn send(recipient: &str, amount: &str) -> Result<String> {
    if !petraAvailable() {
        return Err(WalletError::not_installed(WALLET_NAME));
    }
    let octas = parse_positive_amount(amount, DECIMALS).map_err(WalletError::connection)?;

    let hash = petraSubmitTransfer(recipient, &octas.to_string())
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to send Aptos transaction"))?
        .as_string()
        .ok_or_else(|| WalletError::connection("Petra returned no transaction hash"))?;

    wait_for_transaction(&hash).await?;
    Ok(hash)
}

fn chain_name(chain_id: &str) -> String {
    CHAIN_NAMES
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| "Unknown Network".to_string())
}

/// Explorer link with `/txn/{hash}` and a `?network=` selector for
/// non-mainnet networks. Unknown ids fall back to testnet.
pub fn explorer_url(chain_id: &str, tx_hash: &str) -> String {
    let network = match chain_id {
        "1" => None,
        "3" => Some("devnet"),
        _ => Some("testnet"),
    };
    match network {
        None => format!("{}/txn/{}", EXPLORER_BASE, tx_hash),
        Some(network) => format!("{}/txn/{}?network={}", EXPLORER_BASE, tx_hash, network),
    }
}

pub fn subscribe_changes(callback: &js_sys::Function) {
    petraOnChange(callback);
}

pub fn unsubscribe_changes(callback: &js_sys::Function) {
    petraRemoveListener("accountChanged", callback);
    petraRemoveListener("networkChanged", callback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octas_to_apt() {
        // 2_000_000 octas is 0.02 APT.
        assert_eq!(format_units(2_000_000, DECIMALS, DISPLAY_PLACES), "0.02");
        assert_eq!(format_units(100_000_000, DECIMALS, DISPLAY_PLACES), "1");
    }

    #[test]
    fn testnet_chain_identity() {
        assert_eq!(chain_name("2"), "Aptos Testnet");
        assert_eq!(chain_name("1"), "Aptos Mainnet");
        assert_eq!(chain_name("9"), "Unknown Network");
    }

    #[test]
    fn explorer_url_selects_network_by_query() {
        assert_eq!(
            explorer_url("2", "0xabc"),
            "https://explorer.aptoslabs.com/txn/0xabc?network=testnet"
        );
        assert_eq!(
            explorer_url("3", "0xabc"),
            "https://explorer.aptoslabs.com/txn/0xabc?network=devnet"
        );
        assert_eq!(
            explorer_url("1", "0xabc"),
            "https://explorer.aptoslabs.com/txn/0xabc"
        );
        // Unknown network ids fall back to testnet.
        assert_eq!(
            explorer_url("42", "0xabc"),
            "https://explorer.aptoslabs.com/txn/0xabc?network=testnet"
        );
    }
}
