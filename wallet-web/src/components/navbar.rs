//! Navigation bar with the connected-address pill.

use leptos::prelude::*;
use leptos_router::components::A;

use shared::utils::truncate_address;

use crate::state::wallet::use_wallet_context;

#[component]
pub fn Navbar() -> impl IntoView {
    let wallet_ctx = use_wallet_context();

    view! {
        <nav class="navbar">
            <div class="navbar-inner">
                <A href="/" class="nav-brand">
                    <span class="nav-title">"Wallet-Linker"</span>
                </A>
                {move || wallet_ctx.address().map(|address| view! {
                    <div class="nav-address">
                        <span class="nav-dot"></span>
                        <span class="nav-address-text">{truncate_address(&address)}</span>
                    </div>
                })}
            </div>
        </nav>
    }
}
