//! Checkout Configuration

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};

/// When the payment sheet is built
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    /// Fetch methods and build the sheet when the shopper clicks pay
    #[default]
    Lazy,
    /// Fetch methods and build the sheet at page load
    Eager,
}

impl CheckoutMode {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lazy" => Ok(Self::Lazy),
            "eager" => Ok(Self::Eager),
            other => Err(CheckoutError::Config(format!(
                "unknown checkout mode '{other}' (expected lazy or eager)"
            ))),
        }
    }
}

/// Checkout settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Merchant backend origin
    pub base_url: String,

    /// Path of the payment methods endpoint
    pub payment_methods_path: String,

    /// Path of the payment initiation endpoint
    pub initiate_payment_path: String,

    /// Extra Payment Request method identifier offered next to cards
    #[serde(default)]
    pub alternative_method: Option<String>,

    #[serde(default)]
    pub mode: CheckoutMode,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            payment_methods_path: "/api/getPaymentMethods".into(),
            initiate_payment_path: "/api/initiatePayment".into(),
            alternative_method: None,
            mode: CheckoutMode::Lazy,
        }
    }
}

impl CheckoutConfig {
    /// Defaults pointed at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mode = match var("CHECKOUT_MODE") {
            Some(mode) => CheckoutMode::from_str(&mode)?,
            None => defaults.mode,
        };

        Ok(Self {
            base_url: var("CHECKOUT_BASE_URL").unwrap_or(defaults.base_url),
            payment_methods_path: var("CHECKOUT_PAYMENT_METHODS_PATH")
                .unwrap_or(defaults.payment_methods_path),
            initiate_payment_path: var("CHECKOUT_INITIATE_PATH")
                .unwrap_or(defaults.initiate_payment_path),
            alternative_method: var("CHECKOUT_ALTERNATIVE_METHOD"),
            mode,
        })
    }

    pub fn payment_methods_url(&self) -> String {
        self.endpoint(&self.payment_methods_path)
    }

    pub fn initiate_payment_url(&self) -> String {
        self.endpoint(&self.initiate_payment_path)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
