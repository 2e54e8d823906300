//! Gateway Payment Methods
//!
//! Shape of the `/api/getPaymentMethods` answer and the card network
//! intersection between the gateway and the Payment Request API.

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};

/// Card networks the Payment Request API understands, in presentation order.
///
/// Entries use the gateway's brand codes; `mc` is renamed on the way out.
pub const PAYMENT_REQUEST_NETWORKS: [&str; 9] = [
    "amex",
    "cartebancaire",
    "diners",
    "discover",
    "jcb",
    "mc",
    "mir",
    "unionpay",
    "visa",
];

/// Descriptor type the gateway uses for card payments
pub const SCHEME: &str = "scheme";

/// Payment methods available for this checkout, as reported by the gateway
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
}

/// A single gateway payment method descriptor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Method type (`scheme` for cards, `ideal`, `paypal`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Supported card brands, only present for card schemes
    #[serde(default)]
    pub brands: Vec<String>,
}

impl PaymentMethod {
    pub fn is_scheme(&self) -> bool {
        self.kind == SCHEME
    }

    pub fn supports_brand(&self, brand: &str) -> bool {
        self.brands.iter().any(|b| b == brand)
    }
}

impl PaymentMethodsResponse {
    /// First card scheme descriptor
    pub fn scheme_method(&self) -> Result<&PaymentMethod> {
        self.payment_methods
            .iter()
            .find(|m| m.is_scheme())
            .ok_or(CheckoutError::MissingSchemeMethod)
    }
}

/// The gateway calls Mastercard `mc`, the Payment Request API `mastercard`.
fn payment_request_network(brand: &str) -> &str {
    if brand == "mc" { "mastercard" } else { brand }
}

/// Card networks supported by both the gateway and the Payment Request API.
///
/// Order follows [`PAYMENT_REQUEST_NETWORKS`], not the gateway.
pub fn supported_networks(methods: &PaymentMethodsResponse) -> Result<Vec<String>> {
    let card = methods.scheme_method()?;

    Ok(PAYMENT_REQUEST_NETWORKS
        .iter()
        .filter(|network| card.supports_brand(network))
        .map(|network| payment_request_network(network).to_string())
        .collect())
}
