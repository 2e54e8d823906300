//! Native Payment Dialog
//!
//! The browser owns the payment sheet. It is modelled here as an opaque
//! collaborator: `show` suspends until the user pays or cancels, `complete`
//! tells the sheet how the payment ended so it can close.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};
use crate::request::{BASIC_CARD, ShoppingCartDetails, SupportedPaymentMethodData};

/// Status reported to the dialog before it closes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionOutcome {
    Success,
    Fail,
    Unknown,
}

impl CompletionOutcome {
    /// Value expected by `PaymentResponse.complete()`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fail => "fail",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CompletionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card data collected by the `basic-card` method
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cardholder_name: String,
    pub card_security_code: String,
}

impl CardDetails {
    /// Last four digits, for logs
    pub fn last_four(&self) -> &str {
        let digits = self.card_number.trim();
        digits
            .char_indices()
            .rev()
            .nth(3)
            .map_or(digits, |(idx, _)| &digits[idx..])
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &format_args!("**** {}", self.last_four()))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cardholder_name", &self.cardholder_name)
            .field("card_security_code", &"***")
            .finish()
    }
}

/// Token handed back by an alternative payment method handler
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeMethodToken {
    pub id: String,
}

/// What the dialog returns once the user has paid
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentDetails {
    /// Raw card data, forwarded to the gateway
    Card(CardDetails),

    /// Already settled by the alternative method, nothing left to initiate
    AlternativeMethod(AlternativeMethodToken),
}

impl PaymentDetails {
    /// Decode the `details` object of a payment response.
    ///
    /// `basic-card` responses carry card data; every other method is
    /// expected to hand back a token `{ "id": ... }`.
    pub fn from_response(method_name: &str, details: serde_json::Value) -> Result<Self> {
        if method_name == BASIC_CARD {
            let card = serde_json::from_value(details)
                .map_err(|e| CheckoutError::Dialog(format!("Malformed card details: {e}")))?;
            return Ok(Self::Card(card));
        }

        let token = serde_json::from_value(details).map_err(|e| {
            CheckoutError::Dialog(format!("Malformed {method_name} response: {e}"))
        })?;
        Ok(Self::AlternativeMethod(token))
    }
}

/// A single native payment sheet.
///
/// Both calls suspend. A cancelled sheet must surface as
/// [`CheckoutError::DialogRejected`] from `show`.
#[async_trait(?Send)]
pub trait PaymentDialog {
    /// Present the sheet and wait for the user
    async fn show(&mut self) -> Result<PaymentDetails>;

    /// Report the final status and let the sheet close
    async fn complete(&mut self, outcome: CompletionOutcome) -> Result<()>;
}

/// Creates payment sheets (`new PaymentRequest(methodData, details)`)
pub trait DialogFactory {
    fn create(
        &self,
        methods: &[SupportedPaymentMethodData],
        cart: &ShoppingCartDetails,
    ) -> Result<Box<dyn PaymentDialog>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CardDetails {
        CardDetails {
            card_number: "4111111111111111".into(),
            expiry_month: "03".into(),
            expiry_year: "2030".into(),
            cardholder_name: "J. Smith".into(),
            card_security_code: "737".into(),
        }
    }

    #[test]
    fn test_debug_masks_card() {
        let debug = format!("{:?}", card());
        assert!(debug.contains("**** 1111"));
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("737"));
    }

    #[test]
    fn test_last_four_short_number() {
        let mut short = card();
        short.card_number = "42".into();
        assert_eq!(short.last_four(), "42");
    }

    #[test]
    fn test_outcome_strings() {
        assert_eq!(CompletionOutcome::Success.to_string(), "success");
        assert_eq!(
            serde_json::to_value(CompletionOutcome::Unknown).unwrap(),
            "unknown"
        );
    }

    #[test]
    fn test_basic_card_response() {
        let details = serde_json::json!({
            "cardNumber": "4111111111111111",
            "expiryMonth": "03",
            "expiryYear": "2030",
            "cardholderName": "J. Smith",
            "cardSecurityCode": "737",
            "billingAddress": null
        });

        let parsed = PaymentDetails::from_response("basic-card", details).unwrap();
        assert_eq!(parsed, PaymentDetails::Card(card()));
    }

    #[test]
    fn test_alternative_response() {
        let details = serde_json::json!({ "id": "tok_123" });
        let parsed = PaymentDetails::from_response("https://bobpay.xyz/pay", details).unwrap();
        assert_eq!(
            parsed,
            PaymentDetails::AlternativeMethod(AlternativeMethodToken { id: "tok_123".into() })
        );
    }

    #[test]
    fn test_malformed_response() {
        let result = PaymentDetails::from_response("basic-card", serde_json::json!({}));
        assert!(matches!(result, Err(CheckoutError::Dialog(_))));
    }
}
