//! Connect Wallet page.
//!
//! Entry point of the app: pick one of the supported wallets, run its
//! adapter's connect, and move to the account page on success. Both error
//! kinds surface here as a banner; a failed connect leaves the session
//! empty.

use leptos::logging::log;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::ConnectButton;
use crate::services::wallets::{self, WalletKind};
use crate::state::wallet::use_wallet_context;

#[component]
pub fn ConnectPage() -> impl IntoView {
    let wallet_ctx = use_wallet_context();
    let navigate = use_navigate();

    let connecting = move || wallet_ctx.session.with(|s| s.is_connecting);
    let error = move || wallet_ctx.session.with(|s| s.error.clone());

    let connect_wallet = move |kind: WalletKind| {
        if wallet_ctx.session.with_untracked(|s| s.is_connecting) {
            return;
        }
        wallet_ctx.begin_connect();

        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match wallets::connect(kind).await {
                Ok(info) => {
                    log!("{} connected: {}", kind.label(), info.address);
                    wallet_ctx.complete_connect(kind, info);
                    navigate(&format!("/account?type={}", kind.as_str()), Default::default());
                }
                Err(e) => {
                    log!("Failed to connect {}: {}", kind.label(), e);
                    wallet_ctx.fail_connect(e.to_string());
                }
            }
        });
    };

    view! {
        <div class="page page-center">
            <div class="connect-hero">
                <h1 class="main-header">"Wallet-Linker"</h1>
                <p class="main-subheader">"One hub for your Ethereum, Solana, Aptos and Cosmos wallets"</p>

                {move || error().map(|err| view! {
                    <div class="error">
                        <p>{err}</p>
                    </div>
                })}

                {move || {
                    let connect_wallet = connect_wallet.clone();
                    if connecting() {
                        view! {
                            <div class="connecting-indicator">
                                <div class="spinner"></div>
                                <span>"Connecting..."</span>
                            </div>
                        }.into_any()
                    } else {
                        view! {
                            <ConnectButton on_select=connect_wallet/>
                        }.into_any()
                    }
                }}
            </div>
        </div>
    }
}
