//! Payment Request API bindings
//!
//! Raw `PaymentRequest` / `PaymentResponse` handles and the
//! [`PaymentDialog`] implementation on top of them.

use async_trait::async_trait;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{self, Promise};

use checkout_core::{
    CheckoutError, CompletionOutcome, DialogFactory, PaymentDetails, PaymentDialog,
    ShoppingCartDetails, SupportedPaymentMethodData,
};

#[wasm_bindgen]
extern "C" {
    /// `window.PaymentRequest`
    #[derive(Debug, Clone)]
    pub type PaymentRequest;

    /// Settled value of `request.show()`
    #[derive(Debug, Clone)]
    pub type PaymentResponse;

    /// `new PaymentRequest(methodData, details)`
    #[wasm_bindgen(constructor, catch, js_class = "PaymentRequest")]
    pub fn new(method_data: &JsValue, details: &JsValue) -> Result<PaymentRequest, JsValue>;

    /// `request.show()` → `Promise<PaymentResponse>`
    #[wasm_bindgen(method, catch)]
    pub fn show(this: &PaymentRequest) -> Result<Promise, JsValue>;

    /// `response.methodName`
    #[wasm_bindgen(method, getter, js_name = methodName)]
    pub fn method_name(this: &PaymentResponse) -> String;

    /// `response.details`
    #[wasm_bindgen(method, getter)]
    pub fn details(this: &PaymentResponse) -> JsValue;

    /// `response.complete("success" | "fail" | "unknown")` → `Promise`
    #[wasm_bindgen(method, catch)]
    pub fn complete(this: &PaymentResponse, result: &str) -> Result<Promise, JsValue>;
}

/// Whether this browser exposes the Payment Request API
pub fn is_supported() -> bool {
    web_sys::window().is_some_and(|w| {
        js_sys::Reflect::has(&w, &JsValue::from_str("PaymentRequest")).unwrap_or(false)
    })
}

fn to_js<T: Serialize>(value: &T) -> checkout_core::Result<JsValue> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|e| CheckoutError::Dialog(describe(&e)))
}

fn from_js(value: &JsValue) -> checkout_core::Result<serde_json::Value> {
    let json: String = js_sys::JSON::stringify(value)
        .map_err(|e| CheckoutError::Dialog(describe(&e)))?
        .into();
    Ok(serde_json::from_str(&json)?)
}

fn js_property(value: &JsValue, key: &str) -> Option<String> {
    js_sys::Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}

/// `"<name>: <message>"` for DOMExceptions, debug output otherwise
fn describe(error: &JsValue) -> String {
    match (js_property(error, "name"), js_property(error, "message")) {
        (Some(name), Some(message)) => format!("{name}: {message}"),
        (None, Some(message)) => message,
        _ => format!("{error:?}"),
    }
}

/// The sheet rejects `show()` with `AbortError` when the shopper closes it
fn dialog_error(error: JsValue) -> CheckoutError {
    if js_property(&error, "name").as_deref() == Some("AbortError") {
        CheckoutError::DialogRejected(describe(&error))
    } else {
        CheckoutError::Dialog(describe(&error))
    }
}

/// One browser payment sheet
pub struct BrowserDialog {
    request: PaymentRequest,
    response: Option<PaymentResponse>,
}

#[async_trait(?Send)]
impl PaymentDialog for BrowserDialog {
    async fn show(&mut self) -> checkout_core::Result<PaymentDetails> {
        let promise = self.request.show().map_err(dialog_error)?;
        let response: PaymentResponse = JsFuture::from(promise)
            .await
            .map_err(dialog_error)?
            .unchecked_into();

        let details =
            PaymentDetails::from_response(&response.method_name(), from_js(&response.details())?)?;
        self.response = Some(response);
        Ok(details)
    }

    async fn complete(&mut self, outcome: CompletionOutcome) -> checkout_core::Result<()> {
        let response = self.response.take().ok_or_else(|| {
            CheckoutError::Dialog("payment sheet has no response to complete".into())
        })?;

        let promise = response.complete(outcome.as_str()).map_err(dialog_error)?;
        JsFuture::from(promise).await.map_err(dialog_error)?;
        Ok(())
    }
}

/// Builds [`BrowserDialog`]s
pub struct BrowserDialogs;

impl DialogFactory for BrowserDialogs {
    fn create(
        &self,
        methods: &[SupportedPaymentMethodData],
        cart: &ShoppingCartDetails,
    ) -> checkout_core::Result<Box<dyn PaymentDialog>> {
        let request =
            PaymentRequest::new(&to_js(&methods)?, &to_js(cart)?).map_err(dialog_error)?;

        Ok(Box::new(BrowserDialog {
            request,
            response: None,
        }))
    }
}
