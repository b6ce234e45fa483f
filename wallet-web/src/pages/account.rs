//! Account page.
//!
//! Selected by the `?type=` query parameter. Re-runs the adapter's connect
//! to populate the session, listens for wallet-originated account/network
//! changes, and hosts the send modal. Every path that re-reads the wallet
//! funnels through the same guarded refresh: overlapping refresh requests
//! (a second change event, or one arriving mid-send) are dropped.

use leptos::logging::log;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use shared::utils::format_address;

use crate::components::SendModal;
use crate::services::wallets::{self, WalletKind};
use crate::state::wallet::use_wallet_context;
use crate::utils::url::get_query_param;

#[component]
pub fn AccountPage() -> impl IntoView {
    let wallet_ctx = use_wallet_context();
    let navigate = use_navigate();
    let query = use_query_map();

    // Adapter tag from the URL; the router's query map may not be populated
    // yet on a hard reload, so fall back to reading location.search.
    let kind: Option<WalletKind> = query
        .with_untracked(|params| params.get("type"))
        .or_else(|| get_query_param("type"))
        .and_then(|tag| tag.parse().ok());

    let show_send = RwSignal::new(false);

    let refresh = {
        let navigate = navigate.clone();
        move |kind: WalletKind| {
            if !wallet_ctx.begin_refresh() {
                return;
            }
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match wallets::connect(kind).await {
                    Ok(info) => wallet_ctx.complete_refresh(kind, info),
                    Err(e) => {
                        log!("Failed to refresh wallet info: {}", e);
                        wallet_ctx.fail_refresh();
                        wallet_ctx.disconnect();
                        navigate("/", Default::default());
                    }
                }
            });
        }
    };

    match kind {
        Some(kind) => {
            // Initial population.
            refresh(kind);

            // Wallet-originated change notifications re-enter the same
            // guarded refresh via a tick signal.
            let change_tick = RwSignal::new(0u32);
            let callback = Closure::<dyn FnMut()>::new(move || {
                change_tick.update(|n| *n += 1);
            });
            let function: js_sys::Function = callback.as_ref().clone().unchecked_into();
            wallets::subscribe_changes(kind, &function);

            // The closure and its JS handle are not thread-safe, so they are
            // parked in arena-local storage until unmount.
            let listener = StoredValue::new_local(Some((callback, function)));
            on_cleanup(move || {
                listener.update_value(|entry| {
                    if let Some((closure, function)) = entry.take() {
                        wallets::unsubscribe_changes(kind, &function);
                        drop(closure);
                    }
                });
            });
            {
                let refresh = refresh.clone();
                Effect::new(move || {
                    if change_tick.get() > 0 {
                        refresh(kind);
                    }
                });
            }
        }
        None => {
            let navigate = navigate.clone();
            Effect::new(move || {
                navigate("/", Default::default());
            });
        }
    }

    let on_disconnect = {
        let navigate = navigate.clone();
        move |_| {
            wallet_ctx.disconnect();
            navigate("/", Default::default());
        }
    };

    let on_tx_success = {
        let refresh = refresh.clone();
        move |_tx| {
            if let Some(kind) = kind {
                refresh(kind);
            }
        }
    };

    let symbol = move || {
        wallet_ctx
            .kind()
            .map(|k| k.symbol().to_string())
            .unwrap_or_default()
    };

    view! {
        <div class="page">
            <div class="card account-card">
                <div class="account-header">
                    <div>
                        <h1>"Wallet Information"</h1>
                        <p class="subtitle">
                            {move || wallet_ctx.kind()
                                .map(|k| format!("Connected with {}", k.label()))
                                .unwrap_or_else(|| "Connecting...".to_string())}
                        </p>
                    </div>
                    <button class="btn btn-danger" on:click=on_disconnect>
                        "Disconnect"
                    </button>
                </div>

                {move || match wallet_ctx.session.with(|s| s.connected.clone()) {
                    Some(connected) => view! {
                        <div class="account-rows">
                            <div class="account-row">
                                <span class="row-label">"Address"</span>
                                <span class="row-value mono">{connected.info.address.clone()}</span>
                            </div>
                            <div class="account-row">
                                <span class="row-label">"Balance"</span>
                                <span class="row-value balance">
                                    {format!("{} {}", connected.info.balance, connected.kind.symbol())}
                                </span>
                            </div>
                            <div class="account-row">
                                <span class="row-label">"Network"</span>
                                <span class="row-value">
                                    {connected.info.chain_name.clone()}
                                    " "
                                    <span class="row-detail">{format!("({})", connected.info.chain_id)}</span>
                                </span>
                            </div>
                        </div>
                    }.into_any(),
                    None => view! {
                        <div class="connecting-indicator">
                            <div class="spinner"></div>
                            <span>"Loading wallet..."</span>
                        </div>
                    }.into_any(),
                }}

                <div class="account-actions">
                    <button
                        class="btn btn-primary"
                        disabled=move || !wallet_ctx.is_connected()
                        on:click=move |_| show_send.set(true)
                    >
                        {move || format!("Send {}", symbol())}
                    </button>

                    {move || wallet_ctx.session.with(|s| s.last_tx.clone()).map(|tx| view! {
                        <div class="tx-result">
                            <p class="tx-hash">
                                "Transaction Hash: "
                                <span class="mono">{format_address(&tx.tx_hash, 10, 8)}</span>
                            </p>
                            <a
                                href=tx.explorer_url.clone()
                                target="_blank"
                                rel="noopener noreferrer"
                            >
                                "View on Explorer \u{2192}"
                            </a>
                        </div>
                    })}
                </div>
            </div>

            <SendModal open=show_send on_success=on_tx_success/>
        </div>
    }
}
