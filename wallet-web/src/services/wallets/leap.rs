//! Leap adapter (Cosmos).
//!
//! `window.leap` provides `enable`/`getKey` and an offline signer; signing
//! and broadcast go through the page-loaded CosmJS bundle against the
//! chain's RPC endpoint, while balance reads use the chain's LCD REST API.
//! The app defaults to Cosmos Hub but the adapter is parameterized over a
//! small chain registry.

use serde::Deserialize;
use shared::dto::wallet::WalletInfo;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use crate::services::error::{Result, WalletError};
use crate::utils::units::{format_units, parse_positive_amount};

const WALLET_NAME: &str = "Leap";

/// Micro-denomination exponent (uatom, uosmo, ujuno).
const DECIMALS: u32 = 6;
const DISPLAY_PLACES: usize = 6;

/// Chain the app operates on.
const DEFAULT_CHAIN_ID: &str = "cosmoshub-4";

/// Stargate's complaint about a sender account that has never held funds.
const ACCOUNT_MISSING_PATTERN: &str = "does not exist on chain";

struct CosmosChain {
    id: &'static str,
    name: &'static str,
    rpc: &'static str,
    rest: &'static str,
    denom: &'static str,
    prefix: &'static str,
    explorer: &'static str,
}

const CHAINS: &[CosmosChain] = &[
    CosmosChain {
        id: "cosmoshub-4",
        name: "Cosmos Hub",
        rpc: "https://cosmos-rpc.publicnode.com",
        rest: "https://cosmos-rest.publicnode.com",
        denom: "uatom",
        prefix: "cosmos",
        explorer: "https://www.mintscan.io/cosmos",
    },
    CosmosChain {
        id: "osmosis-1",
        name: "Osmosis",
        rpc: "https://osmosis-rpc.publicnode.com",
        rest: "https://osmosis-rest.publicnode.com",
        denom: "uosmo",
        prefix: "osmo",
        explorer: "https://www.mintscan.io/osmosis",
    },
    CosmosChain {
        id: "juno-1",
        name: "Juno",
        rpc: "https://juno-rpc.publicnode.com",
        rest: "https://juno-rest.publicnode.com",
        denom: "ujuno",
        prefix: "juno",
        explorer: "https://www.mintscan.io/juno",
    },
];

#[wasm_bindgen(inline_js = "
export function leapAvailable() {
    return typeof window.leap !== 'undefined';
}

export async function leapGetKey(chainId) {
    await window.leap.enable(chainId);
    const key = await window.leap.getKey(chainId);
    return key.bech32Address;
}

export async function leapSendTokens(chainId, rpcUrl, recipient, amount, denom) {
    const cosmjs = window.cosmjs;
    if (!cosmjs || !cosmjs.SigningStargateClient) {
        throw new Error('CosmJS bundle is not loaded');
    }
    const signer = window.leap.getOfflineSignerAuto(chainId);
    const accounts = await signer.getAccounts();
    const client = await cosmjs.SigningStargateClient.connectWithSigner(rpcUrl, signer);

    const fee = {
        amount: [{ denom: denom, amount: '5000' }],
        gas: '200000',
    };
    const result = await client.sendTokens(
        accounts[0].address,
        recipient,
        [{ denom: denom, amount: amount }],
        fee,
        'Sent via Wallet-Linker'
    );
    return result.transactionHash;
}
")]
extern "C" {
    fn leapAvailable() -> bool;

    #[wasm_bindgen(catch)]
    async fn leapGetKey(chain_id: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn leapSendTokens(
        chain_id: &str,
        rpc_url: &str,
        recipient: &str,
        amount: &str,
        denom: &str,
    ) -> std::result::Result<JsValue, JsValue>;
}

#[derive(Deserialize)]
struct BalancesResponse {
    #[serde(default)]
    balances: Vec<Coin>,
}

#[derive(Deserialize)]
struct Coin {
    denom: String,
    amount: String,
}

fn chain(chain_id: &str) -> Result<&'static CosmosChain> {
    CHAINS
        .iter()
        .find(|c| c.id == chain_id)
        .ok_or_else(|| WalletError::connection(format!("Unsupported chain: {}", chain_id)))
}

/// Bech32 shape check against the chain's account prefix: `{prefix}1` plus
/// lowercase alphanumeric data. Full checksum verification is the signing
/// client's job.
fn validate_recipient(chain: &CosmosChain, recipient: &str) -> Result<()> {
    let valid = recipient
        .strip_prefix(chain.prefix)
        .and_then(|rest| rest.strip_prefix('1'))
        .map(|data| {
            !data.is_empty()
                && data
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(WalletError::connection(format!(
            "Invalid {} address format",
            chain.name
        )))
    }
}

pub fn available() -> bool {
    leapAvailable()
}

async fn balance_micro(chain: &CosmosChain, address: &str) -> Result<u128> {
    let url = format!("{}/cosmos/bank/v1beta1/balances/{}", chain.rest, address);
    let response = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| WalletError::connection(format!("Balance query failed: {}", e)))?;

    if !response.ok() {
        return Err(WalletError::connection(format!(
            "Failed to read balances (HTTP {})",
            response.status()
        )));
    }

    let body: BalancesResponse = response
        .json()
        .await
        .map_err(|e| WalletError::connection(format!("Malformed balances response: {}", e)))?;

    // A brand-new account has no bank entries at all.
    let amount = body
        .balances
        .iter()
        .find(|c| c.denom == chain.denom)
        .map(|c| c.amount.as_str())
        .unwrap_or("0");
    amount
        .parse()
        .map_err(|_| WalletError::connection("Failed to parse balance value"))
}

pub async fn connect() -> Result<WalletInfo> {
    connect_chain(DEFAULT_CHAIN_ID).await
}

pub async fn connect_chain(chain_id: &str) -> Result<WalletInfo> {
    if !leapAvailable() {
        return Err(WalletError::not_installed(WALLET_NAME));
    }
    let chain = chain(chain_id)?;

    let address = leapGetKey(chain_id)
        .await
        .map_err(|e| WalletError::from_js(e, "Failed to connect to Leap wallet"))?
        .as_string()
        .ok_or_else(|| WalletError::connection("Leap returned no bech32 address"))?;

    let micro = balance_micro(chain, &address).await?;

    Ok(WalletInfo {
        address,
        balance: format_units(micro, DECIMALS, DISPLAY_PLACES),
        chain_id: chain_id.to_string(),
        chain_name: chain.name.to_string(),
    })
}

pub async fn send(recipient: &str, amount: &str) -> Result<String> {
    send_chain(DEFAULT_CHAIN_ID, recipient, amount).await
}

/// `bank send` with a fixed fee, signed by the extension's offline signer.
/// The signing client waits for inclusion before returning the hash.
pub async fn send_chain(chain_id: &str, recipient: &str, amount: &str) -> Result<String> {
    if !leapAvailable() {
        return Err(WalletError::not_installed(WALLET_NAME));
    }
    let chain = chain(chain_id)?;
    validate_recipient(chain, recipient)?;
    let micro = parse_positive_amount(amount, DECIMALS).map_err(WalletError::connection)?;

    leapSendTokens(chain_id, chain.rpc, recipient, &micro.to_string(), chain.denom)
        .await
        .map_err(|e| translate_send_error(WalletError::from_js(e, "Failed to send transaction")))?
        .as_string()
        .ok_or_else(|| WalletError::connection("Leap returned no transaction hash"))
}

/// An account that has never received funds cannot originate a signed
/// transaction; stargate reports this with a distinctive message that
/// deserves a more actionable one than "connection failed".
fn translate_send_error(err: WalletError) -> WalletError {
    match &err {
        WalletError::Connection { message, .. } if message.contains(ACCOUNT_MISSING_PATTERN) => {
            WalletError::connection(
                "Sender account has never been funded: receive some tokens before sending",
            )
        }
        _ => err,
    }
}

pub fn chain_name(chain_id: &str) -> String {
    CHAINS
        .iter()
        .find(|c| c.id == chain_id)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| "Unknown Network".to_string())
}

/// Mintscan link with the `/txs/{hash}` suffix; unknown chains fall back to
/// Cosmos Hub.
pub fn explorer_url(chain_id: &str, tx_hash: &str) -> String {
    let base = CHAINS
        .iter()
        .find(|c| c.id == chain_id)
        .map(|c| c.explorer)
        .unwrap_or(CHAINS[0].explorer);
    format!("{}/txs/{}", base, tx_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micro_to_display() {
        assert_eq!(format_units(1_500_000, DECIMALS, DISPLAY_PLACES), "1.5");
        assert_eq!(format_units(1, DECIMALS, DISPLAY_PLACES), "0.000001");
    }

    #[test]
    fn recipient_prefix_is_checked_per_chain() {
        let hub = chain("cosmoshub-4").unwrap();
        assert!(validate_recipient(hub, "cosmos1vqpjljwsynsn58dugz0w8ut7kun7t8ls2qkmsq").is_ok());
        assert!(validate_recipient(hub, "osmo1vqpjljwsynsn58dugz0w8ut7kun7t8ls2qkmsq").is_err());
        assert!(validate_recipient(hub, "cosmos2abcdef").is_err());
        assert!(validate_recipient(hub, "cosmos1ABC").is_err());
        assert!(validate_recipient(hub, "cosmos1").is_err());

        let osmosis = chain("osmosis-1").unwrap();
        assert!(validate_recipient(osmosis, "osmo1vqpjljwsynsn58dugz0w8ut7kun7t8ls").is_ok());
    }

    #[test]
    fn unsupported_chain_is_rejected() {
        assert!(chain("terra-2").is_err());
        assert_eq!(chain_name("terra-2"), "Unknown Network");
    }

    #[test]
    fn explorer_url_uses_txs_suffix() {
        assert_eq!(
            explorer_url("osmosis-1", "ABC123"),
            "https://www.mintscan.io/osmosis/txs/ABC123"
        );
        // Unknown chains fall back to Cosmos Hub.
        assert_eq!(
            explorer_url("terra-2", "ABC123"),
            "https://www.mintscan.io/cosmos/txs/ABC123"
        );
    }

    #[test]
    fn never_funded_sender_gets_an_actionable_message() {
        let raw = WalletError::connection(
            "Account 'cosmos1xyz' does not exist on chain. Send some tokens there before trying to query sequence.",
        );
        let translated = translate_send_error(raw);
        assert_eq!(
            translated.to_string(),
            "Sender account has never been funded: receive some tokens before sending"
        );

        // Anything else passes through untouched.
        let other = WalletError::connection("Request rejected");
        assert_eq!(translate_send_error(other).to_string(), "Request rejected");
    }
}
