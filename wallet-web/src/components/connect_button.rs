//! Connect Wallet button and wallet picker modal.

use leptos::prelude::*;

use crate::services::wallets::{self, WalletKind};

#[component]
pub fn ConnectButton<F>(on_select: F) -> impl IntoView
where
    F: Fn(WalletKind) + Clone + 'static,
{
    let (show_modal, set_show_modal) = signal(false);

    view! {
        <button class="btn btn-primary" on:click=move |_| set_show_modal.set(true)>
            "Connect Wallet"
        </button>

        {move || {
            let on_select = on_select.clone();
            show_modal.get().then(move || view! {
                <div class="modal-overlay">
                    <div class="modal-card">
                        <button
                            class="modal-close"
                            on:click=move |_| set_show_modal.set(false)
                        >
                            "\u{00d7}"
                        </button>
                        <h2 class="modal-title">"Connect Wallet"</h2>
                        <div class="wallet-options">
                            {WalletKind::ALL.into_iter().map(|kind| {
                                let on_select = on_select.clone();
                                let detected = wallets::available(kind);
                                view! {
                                    <button
                                        class="wallet-button"
                                        on:click=move |_| {
                                            set_show_modal.set(false);
                                            on_select(kind);
                                        }
                                    >
                                        <span class="wallet-name">
                                            {format!("Connect {}", kind.label())}
                                        </span>
                                        {(!detected).then(|| view! {
                                            <span class="wallet-hint">"not detected"</span>
                                        })}
                                    </button>
                                }
                            }).collect::<Vec<_>>()}
                        </div>
                    </div>
                </div>
            })
        }}
    }
}
