//! Checkout Wiring

use std::rc::Rc;

use checkout_core::{CheckoutConfig, CheckoutFlow, CheckoutMode};
use checkout_gateway::HttpGateway;

use crate::browser::{AlertNotifier, LocationNavigator};
use crate::payment_request::BrowserDialogs;

/// Backend on the page's own origin; mode and alternative method are fixed
/// at build time (`CHECKOUT_MODE`, `CHECKOUT_ALTERNATIVE_METHOD`).
pub fn browser_config() -> CheckoutConfig {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:8080".into());

    let mode = option_env!("CHECKOUT_MODE")
        .and_then(|m| CheckoutMode::from_str(m).ok())
        .unwrap_or_default();

    CheckoutConfig {
        alternative_method: option_env!("CHECKOUT_ALTERNATIVE_METHOD").map(String::from),
        mode,
        ..CheckoutConfig::with_base_url(origin)
    }
}

/// Flow wired to `fetch`, `PaymentRequest`, `location.href` and `alert`
pub fn checkout_flow(config: &CheckoutConfig) -> CheckoutFlow {
    CheckoutFlow::new(
        Rc::new(HttpGateway::new(config)),
        Rc::new(BrowserDialogs),
        Rc::new(LocationNavigator),
        Rc::new(AlertNotifier),
    )
    .with_alternative_method(config.alternative_method.clone())
}
