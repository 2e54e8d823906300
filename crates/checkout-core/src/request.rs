//! Payment Request Construction
//!
//! Method data and cart details handed to the native payment dialog.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::methods::{PaymentMethodsResponse, supported_networks};

/// Payment Request method identifier for card entry
pub const BASIC_CARD: &str = "basic-card";

/// One entry of the `methodData` sequence passed to `new PaymentRequest(...)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedPaymentMethodData {
    /// Method identifier (`basic-card` or a payment handler URL)
    pub supported_methods: String,

    /// Method specific configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BasicCardData>,
}

/// `basic-card` configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicCardData {
    pub supported_networks: Vec<String>,
    pub supported_types: Vec<String>,
}

impl SupportedPaymentMethodData {
    /// Credit card entry restricted to `networks`
    pub fn basic_card(networks: Vec<String>) -> Self {
        Self {
            supported_methods: BASIC_CARD.into(),
            data: Some(BasicCardData {
                supported_networks: networks,
                supported_types: vec!["credit".into()],
            }),
        }
    }

    /// Entry for an alternative payment method, no extra configuration
    pub fn alternative(identifier: impl Into<String>) -> Self {
        Self {
            supported_methods: identifier.into(),
            data: None,
        }
    }
}

/// Build the method data for the dialog from the gateway's payment methods.
///
/// Fails with `MissingSchemeMethod` when the gateway offers no card scheme.
pub fn build_supported_payment_method_data(
    methods: &PaymentMethodsResponse,
    alternative_method: Option<&str>,
) -> Result<Vec<SupportedPaymentMethodData>> {
    let mut data = vec![SupportedPaymentMethodData::basic_card(supported_networks(methods)?)];

    if let Some(identifier) = alternative_method {
        data.push(SupportedPaymentMethodData::alternative(identifier));
    }

    Ok(data)
}

/// Monetary amount in Payment Request form (`{ currency, value: "5.00" }`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
}

impl CurrencyAmount {
    pub fn eur(value: Decimal) -> Self {
        Self {
            currency: "EUR".into(),
            value,
        }
    }
}

/// A labelled line of the payment sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentItem {
    pub label: String,
    pub amount: CurrencyAmount,
}

impl PaymentItem {
    fn new(label: &str, amount: CurrencyAmount) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// `details` argument of `new PaymentRequest(...)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartDetails {
    pub id: String,
    pub display_items: Vec<PaymentItem>,
    pub total: PaymentItem,
}

/// Fixed demo cart. Not derived from any cart state.
pub fn build_shopping_cart_details() -> ShoppingCartDetails {
    ShoppingCartDetails {
        id: "order-123".into(),
        display_items: vec![
            PaymentItem::new("Sunglasses", CurrencyAmount::eur(dec!(5.00))),
            PaymentItem::new("Headphones", CurrencyAmount::eur(dec!(5.00))),
        ],
        total: PaymentItem::new("Total", CurrencyAmount::eur(dec!(10.00))),
    }
}
