//! checkout-web
//!
//! Leptos-based WASM checkout page. Card entry happens in the browser's
//! native payment sheet (`PaymentRequest`); this crate only wires the sheet,
//! the backend client and the redirect into [`checkout_core::CheckoutFlow`].

mod api;
mod app;
mod browser;
mod components;
mod pages;
mod payment_request;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
