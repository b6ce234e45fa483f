//! Phantom adapter (Solana).
//!
//! The extension handles account access and transaction signing through
//! `window.solana`; transaction assembly goes through the page-loaded
//! `window.solanaWeb3` bundle. Balance reads talk JSON-RPC to the cluster
//! endpoint directly.
//!
//! The app pins the devnet cluster, matching the explorer default below.

use serde::{Deserialize, Serialize};
use shared::dto::wallet::WalletInfo;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use crate::services::error::{Result, WalletError};
use crate::utils::units::{format_units, parse_positive_amount};

const WALLET_NAME: &str = "Phantom";

/// Lamports per SOL exponent.
const DECIMALS: u32 = 9;
const DISPLAY_PLACES: usize = 4;

/// Cluster the app operates on.
const CLUSTER: &str = "devnet";
const RPC_ENDPOINT: &str = "https://api.devnet.solana.com";

const EXPLORER_BASE: &str = "https://explorer.solana.com";
const MAINNET_CLUSTER: &str = "mainnet-beta";

const CHAIN_NAMES: &[(&str, &str)] = &[
    ("mainnet-beta", "Solana Mainnet"),
    ("testnet", "Solana Testnet"),
    ("devnet", "Solana Devnet"),
];

#[wasm_bindgen(inline_js = "
export function phantomAvailable() {
    return !!(window.solana && window.solana.isPhantom);
}

export async function phantomConnect() {
    const response = await window.solana.connect();
    return response.publicKey.toString();
}

export async function phantomSendTransfer(cluster, recipient, lamports) {
    const web3 = window.solanaWeb3;
    if (!web3) {
        throw new Error('Solana web3 bundle is not loaded');
    }
    if (!window.solana.isConnected) {
        await window.solana.connect();
    }
    const sender = window.solana.publicKey;
    if (!sender) {
        throw new Error('Failed to retrieve public key from Phantom wallet');
    }

    const connection = new web3.Connection(web3.clusterApiUrl(cluster), 'confirmed');
    const transaction = new web3.Transaction().add(
        web3.SystemProgram.transfer({
            fromPubkey: sender,
            toPubkey: new web3.PublicKey(recipient),
            lamports: Number(lamports),
        })
    );

    const { blockhash } = await connection.getLatestBlockhash('confirmed');
    transaction.recentBlockhash = blockhash;
    transaction.feePayer = sender;

    const signed = await window.solana.signTransaction(transaction);
    const signature = await connection.sendRawTransaction(signed.serialize());
    await connection.confirmTransaction(signature, 'confirmed');
    return signature;
}

export function phantomOn(event, callback) {
    if (window.solana && typeof window.solana.on === 'function') {
        window.solana.on(event, callback);
    }
}

export function phantomRemoveListener(event, callback) {
    if (window.solana && typeof window.solana.removeListener === 'function') {
        window.solana.removeListener(event, callback);
    }
}
")]
extern "C" {
    fn phantomAvailable() -> bool;

    #[wasm_bindgen(catch)]
    async fn phantomConnect() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn phantomSendTransfer(
        cluster: &str,
        recipient: &str,
        lamports: &str,
    ) -> std::result::Result<JsValue, JsValue>;

    fn phantomOn(event: &str, callback: &js_sys::Function);

    fn phantomRemoveListener(event: &str, callback: &js_sys::Function);
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'a str,
    id: u32,
    method: &'a str,
    params: (&'a str,),
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<RpcResult>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcResult {
    value: u64,
}

#[derive(Deserialize)]
struct RpcError {
    message: String,
}

pub fn available() -> bool {
    phantomAvailable()
}

async fn balance_lamports(address: &str) -> Result<u64> {
    let request = RpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method: "getBalance",
        params: (address,),
    };
    let response = gloo_net::http::Request::post(RPC_ENDPOINT)
        .json(&request)
        .map_err(|e| WalletError::connection(format!("Failed to encode balance query: {}", e)))?
        .send()
        .await
        .map_err(|e| WalletError::connection(format!("Balance query failed: {}", e)))?;

    let body: RpcResponse = response
        .json()
        .await
        .map_err(|e| WalletError::connection(format!("Malformed balance response: {}", e)))?;

    if let Some(err) = body.error {
        return Err(WalletError::connection(err.message));
    }
    body.result
        .map(|r| r.value)
        .ok_or_else(|| WalletError::connection("Balance response carried no result"))
}

pub async fn connect() -> Result<WalletInfo> {
    if !phantomAvailable() {
        return Err(WalletError::not_installed(WALLET_NAME));
    }

    let address = phantomConnect()
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to connect to Phantom wallet"))?
        .as_string()
        .ok_or_else(|| WalletError::connection("Phantom returned no public key"))?;

    let lamports = balance_lamports(&address).await?;

    Ok(WalletInfo {
        address,
        balance: format_units(lamports as u128, DECIMALS, DISPLAY_PLACES),
        chain_id: CLUSTER.to_string(),
        chain_name: chain_name(CLUSTER),
    })
}

/// Build, sign, broadcast, and confirm a `SystemProgram` transfer. Recipient
/// validation is left to the underlying web3 bundle, which rejects anything
/// that is not a valid base58 public key.
pub async fn send(recipient: &str, amount: &str) -> Result<String> {
    if !phantomAvailable() {
        return Err(WalletError::not_installed(WALLET_NAME));
    }
    let lamports = parse_positive_amount(amount, DECIMALS).map_err(WalletError::connection)?;

    phantomSendTransfer(CLUSTER, recipient, &lamports.to_string())
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to send transaction with Phantom wallet"))?
        .as_string()
        .ok_or_else(|| WalletError::connection("Phantom returned no transaction signature"))
}

fn chain_name(chain_id: &str) -> String {
    CHAIN_NAMES
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| "Unknown Network".to_string())
}

/// Explorer link; non-mainnet clusters are selected with a `?cluster=` query
/// after the path. Unknown clusters fall back to devnet.
pub fn explorer_url(chain_id: &str, tx_hash: &str) -> String {
    let cluster = if CHAIN_NAMES.iter().any(|(id, _)| *id == chain_id) {
        chain_id
    } else {
        CLUSTER
    };
    if cluster == MAINNET_CLUSTER {
        format!("{}/tx/{}", EXPLORER_BASE, tx_hash)
    } else {
        format!("{}/tx/{}?cluster={}", EXPLORER_BASE, tx_hash, cluster)
    }
}

pub fn subscribe_changes(callback: &js_sys::Function) {
    phantomOn("accountChanged", callback);
}

pub fn unsubscribe_changes(callback: &js_sys::Function) {
    phantomRemoveListener("accountChanged", callback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamports_to_sol() {
        assert_eq!(format_units(1_000_000_000, DECIMALS, DISPLAY_PLACES), "1");
        assert_eq!(format_units(500_000_000, DECIMALS, DISPLAY_PLACES), "0.5");
        assert_eq!(format_units(1_234_567_891, DECIMALS, DISPLAY_PLACES), "1.2345");
    }

    #[test]
    fn explorer_url_places_cluster_query_after_the_path() {
        assert_eq!(
            explorer_url("devnet", "5Sig"),
            "https://explorer.solana.com/tx/5Sig?cluster=devnet"
        );
        assert_eq!(
            explorer_url("testnet", "5Sig"),
            "https://explorer.solana.com/tx/5Sig?cluster=testnet"
        );
        assert_eq!(
            explorer_url("mainnet-beta", "5Sig"),
            "https://explorer.solana.com/tx/5Sig"
        );
    }

    #[test]
    fn explorer_url_unknown_cluster_falls_back_to_devnet() {
        assert_eq!(
            explorer_url("localnet", "5Sig"),
            "https://explorer.solana.com/tx/5Sig?cluster=devnet"
        );
    }

    #[test]
    fn chain_names() {
        assert_eq!(chain_name("devnet"), "Solana Devnet");
        assert_eq!(chain_name("nope"), "Unknown Network");
    }
}
