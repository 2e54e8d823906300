//! Checkout Backend Seam
//!
//! The two calls the flow makes to the merchant backend, which talks to the
//! payment gateway on its behalf.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dialog::CardDetails;
use crate::error::Result;
use crate::methods::{PaymentMethodsResponse, SCHEME};
use crate::routing::GatewayResult;

/// Body of `/api/initiatePayment`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequest {
    pub payment_method: SchemePaymentMethod,
}

/// Raw card payment method.
///
/// Only valid for PCI compliant merchants; everyone else must encrypt the
/// card fields client side before they leave the browser.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemePaymentMethod {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub holder_name: String,
    pub cvc: String,
}

impl std::fmt::Debug for SchemePaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemePaymentMethod")
            .field("kind", &self.kind)
            .field("number", &"****")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("holder_name", &self.holder_name)
            .field("cvc", &"***")
            .finish()
    }
}

impl From<&CardDetails> for InitiatePaymentRequest {
    fn from(card: &CardDetails) -> Self {
        Self {
            payment_method: SchemePaymentMethod {
                kind: SCHEME.into(),
                number: card.card_number.clone(),
                expiry_month: card.expiry_month.clone(),
                expiry_year: card.expiry_year.clone(),
                holder_name: card.cardholder_name.clone(),
                cvc: card.card_security_code.clone(),
            },
        }
    }
}

/// Merchant backend client (Strategy pattern)
///
/// No retries: any failure ends the checkout attempt.
#[async_trait(?Send)]
pub trait Gateway {
    /// `POST /api/getPaymentMethods`
    async fn fetch_payment_methods(&self) -> Result<PaymentMethodsResponse>;

    /// `POST /api/initiatePayment`
    async fn initiate_payment(&self, request: &InitiatePaymentRequest) -> Result<GatewayResult>;
}
