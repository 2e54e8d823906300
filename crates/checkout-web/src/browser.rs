//! Window Side Effects

use checkout_core::{CheckoutError, Navigator, Notifier, ResultTarget, Result};

/// Full page redirect via `window.location.href`
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, target: ResultTarget) -> Result<()> {
        let window =
            web_sys::window().ok_or_else(|| CheckoutError::Navigation("no window".into()))?;

        window
            .location()
            .set_href(target.path())
            .map_err(|e| CheckoutError::Navigation(format!("{e:?}")))
    }
}

/// Console error plus a blocking `alert()`
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        web_sys::console::error_1(&message.into());

        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
