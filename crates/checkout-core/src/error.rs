//! Checkout Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Anything that stops a checkout attempt.
///
/// The variants exist for diagnostics only. Users always see the same
/// notification shape, see [`CheckoutError::user_message`].
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Request to the checkout backend failed
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with something that is not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// User dismissed the payment sheet
    #[error("Payment dialog was dismissed: {0}")]
    DialogRejected(String),

    /// Payment sheet could not be created, shown or completed
    #[error("Payment dialog error: {0}")]
    Dialog(String),

    /// Gateway offered no `scheme` method, so there are no card networks
    #[error("Gateway did not return a card (scheme) payment method")]
    MissingSchemeMethod,

    /// Session step called out of order
    #[error("Checkout session is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// Redirect to the result page failed
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckoutError {
    /// True when the user closed the payment sheet
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::DialogRejected(_))
    }

    /// Message for the blocking user notification
    pub fn user_message(&self) -> String {
        format!("Error occurred: {self}")
    }
}
