//! Send transaction modal.
//!
//! Collects recipient and amount, dispatches the transfer through the
//! connected adapter, and maps failures to user-facing text. This is the
//! consuming layer where well-known vendor error codes become readable
//! messages.

use leptos::logging::log;
use leptos::prelude::*;

use shared::dto::wallet::TransactionResult;

use crate::services::error::user_message;
use crate::services::wallets;
use crate::state::wallet::use_wallet_context;

#[component]
pub fn SendModal<F>(open: RwSignal<bool>, on_success: F) -> impl IntoView
where
    F: Fn(TransactionResult) + Clone + 'static,
{
    let wallet_ctx = use_wallet_context();

    let (recipient, set_recipient) = signal(String::new());
    let (amount, set_amount) = signal(String::new());

    let busy = move || wallet_ctx.session.with(|s| s.is_transacting);
    let error = move || wallet_ctx.session.with(|s| s.transaction_error.clone());
    let symbol = move || {
        wallet_ctx
            .kind()
            .map(|k| k.symbol().to_string())
            .unwrap_or_default()
    };

    let handle_send = {
        let on_success = on_success.clone();
        move |_| {
            if busy() {
                return;
            }
            let to = recipient.get_untracked();
            let value = amount.get_untracked();
            if to.trim().is_empty() || value.trim().is_empty() {
                wallet_ctx.fail_send("Please fill in all fields".to_string());
                return;
            }
            let (Some(kind), Some(chain_id)) = (wallet_ctx.kind(), wallet_ctx.chain_id()) else {
                wallet_ctx.fail_send("No wallet connected".to_string());
                return;
            };

            wallet_ctx.begin_send();
            let on_success = on_success.clone();
            leptos::task::spawn_local(async move {
                match wallets::send(kind, &to, &value).await {
                    Ok(tx_hash) => {
                        let explorer_url = wallets::explorer_url(kind, &chain_id, &tx_hash);
                        let tx = TransactionResult {
                            tx_hash,
                            explorer_url,
                        };
                        wallet_ctx.complete_send(tx.clone());
                        open.set(false);
                        on_success(tx);
                    }
                    Err(e) => {
                        log!("Transaction failed: {}", e);
                        wallet_ctx.fail_send(user_message(&e));
                    }
                }
            });
        }
    };

    view! {
        {move || {
            let handle_send = handle_send.clone();
            open.get().then(move || view! {
                <div class="modal-overlay">
                    <div class="modal-card">
                        <h2 class="modal-title">{move || format!("Send {}", symbol())}</h2>

                        {move || error().map(|err| view! {
                            <div class="error">
                                <p>{err}</p>
                            </div>
                        })}

                        <div class="form-field">
                            <label>"Recipient Address"</label>
                            <input
                                type="text"
                                placeholder="Enter recipient address"
                                prop:value=move || recipient.get()
                                on:input=move |ev| set_recipient.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-field">
                            <label>"Amount"</label>
                            <input
                                type="text"
                                placeholder=move || format!("Amount in {}", symbol())
                                prop:value=move || amount.get()
                                on:input=move |ev| set_amount.set(event_target_value(&ev))
                            />
                        </div>

                        <div class="modal-actions">
                            <button
                                class="btn"
                                disabled=move || busy()
                                on:click=move |_| open.set(false)
                            >
                                "Cancel"
                            </button>
                            <button
                                class="btn btn-primary"
                                disabled=move || busy()
                                on:click=handle_send
                            >
                                {move || if busy() { "Sending..." } else { "Send" }}
                            </button>
                        </div>
                    </div>
                </div>
            })
        }}
    }
}
