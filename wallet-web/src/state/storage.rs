//! localStorage persistence for the wallet session.
//!
//! Two namespaced keys: the identity snapshot and the last transaction.
//! Transient UI flags never reach storage: the persisted types simply have
//! no fields for them. Corrupt entries are discarded, not propagated: a bad
//! snapshot must never block startup.

use shared::dto::wallet::{StoredSession, TransactionResult};
use web_sys::Storage;

const SESSION_KEY: &str = "wallet-linker.session";
const LAST_TX_KEY: &str = "wallet-linker.last-tx";

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn read<T: serde::de::DeserializeOwned>(key: &str) -> Option<T> {
    let raw = local_storage()?.get_item(key).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding corrupt entry {}: {}", key, e);
            None
        }
    }
}

fn write<T: serde::Serialize>(key: &str, value: &T) {
    let Some(storage) = local_storage() else {
        return;
    };
    match serde_json::to_string(value) {
        Ok(raw) => {
            if storage.set_item(key, &raw).is_err() {
                log::warn!("Failed to persist {}", key);
            }
        }
        Err(e) => log::warn!("Failed to serialize {}: {}", key, e),
    }
}

pub fn load_session() -> Option<StoredSession> {
    read(SESSION_KEY).filter(|s: &StoredSession| !s.is_empty())
}

pub fn save_session(session: &StoredSession) {
    write(SESSION_KEY, session);
}

pub fn load_last_tx() -> Option<TransactionResult> {
    read(LAST_TX_KEY)
}

pub fn save_last_tx(tx: &TransactionResult) {
    write(LAST_TX_KEY, tx);
}

/// Remove both entries; called on disconnect and on failed connects.
pub fn clear() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(SESSION_KEY);
        let _ = storage.remove_item(LAST_TX_KEY);
    }
}
