//! Checkout Page

use leptos::prelude::*;

use checkout_core::{CheckoutMode, PreparedCheckout, build_shopping_cart_details};

use crate::api;
use crate::components::CartSummary;
use crate::payment_request;

/// Keep an eagerly built sheet only if no attempt started while it was
/// being built; that attempt already has its own sheet.
fn adopt_prepared<T>(attempt_running: bool, ready: Option<T>) -> Option<T> {
    if attempt_running { None } else { ready }
}

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let config = api::browser_config();
    let flow = StoredValue::new_local(api::checkout_flow(&config));
    let prepared = StoredValue::new_local(None::<PreparedCheckout>);
    let (busy, set_busy) = signal(false);
    let supported = payment_request::is_supported();

    // Eager mode builds the sheet at page load; the button only shows it
    if supported && config.mode == CheckoutMode::Eager {
        let flow = flow.get_value();
        leptos::task::spawn_local(async move {
            let ready = flow.prepare().await;
            prepared.set_value(adopt_prepared(busy.get_untracked(), ready));
        });
    }

    let pay = move |_: leptos::ev::MouseEvent| {
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);

        let flow = flow.get_value();
        let ready = prepared.try_update_value(Option::take).flatten();
        leptos::task::spawn_local(async move {
            // Navigation, if any, has already been triggered
            let _ = match ready {
                Some(ready) => ready.checkout().await,
                None => flow.checkout().await,
            };
            set_busy.set(false);
        });
    };

    view! {
        <div class="checkout">
            <h1>"Checkout"</h1>
            <CartSummary cart=build_shopping_cart_details() />
            <Show
                when=move || supported
                fallback=|| view! {
                    <p class="notice">"This browser does not support the Payment Request API."</p>
                }
            >
                <button class="btn btn-primary" disabled=move || busy.get() on:click=pay>
                    "Pay"
                </button>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_sheet_is_dropped_while_an_attempt_runs() {
        assert_eq!(adopt_prepared(true, Some("sheet")), None);
    }

    #[test]
    fn test_sheet_is_kept_when_idle() {
        assert_eq!(adopt_prepared(false, Some("sheet")), Some("sheet"));
        assert_eq!(adopt_prepared::<&str>(false, None), None);
    }
}
