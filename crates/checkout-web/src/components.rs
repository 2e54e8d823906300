//! UI Components

use leptos::prelude::*;
use checkout_core::{ShoppingCartDetails, request::PaymentItem};

fn amount_label(item: &PaymentItem) -> String {
    format!("{} {}", item.amount.currency, item.amount.value)
}

/// Line items and total of the cart shown in the sheet
#[component]
pub fn CartSummary(cart: ShoppingCartDetails) -> impl IntoView {
    let total = amount_label(&cart.total);

    view! {
        <ul class="cart">
            {cart
                .display_items
                .into_iter()
                .map(|item| {
                    let amount = amount_label(&item);
                    view! {
                        <li class="cart-item">
                            <span class="label">{item.label}</span>
                            <span class="amount">{amount}</span>
                        </li>
                    }
                })
                .collect_view()}
            <li class="cart-total">
                <span class="label">{cart.total.label.clone()}</span>
                <span class="amount">{total}</span>
            </li>
        </ul>
    }
}
