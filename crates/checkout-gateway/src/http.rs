//! HTTP Gateway Client

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use checkout_core::{
    CheckoutConfig, CheckoutError, Gateway, GatewayResult, InitiatePaymentRequest,
    PaymentMethodsResponse, Result,
};

/// Merchant backend client
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    payment_methods_url: String,
    initiate_payment_url: String,
}

impl HttpGateway {
    /// Create a client for the endpoints in `config`
    pub fn new(config: &CheckoutConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create with a preconfigured reqwest client
    pub fn with_client(client: reqwest::Client, config: &CheckoutConfig) -> Self {
        Self {
            client,
            payment_methods_url: config.payment_methods_url(),
            initiate_payment_url: config.initiate_payment_url(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&CheckoutConfig::from_env()?))
    }

    /// POST `body` (or nothing) as JSON and decode the JSON answer.
    ///
    /// The status code is not inspected: the body alone decides.
    async fn call<T: DeserializeOwned>(&self, url: &str, body: Option<String>) -> Result<T> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body.unwrap_or_default())
            .send()
            .await
            .map_err(|e| CheckoutError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(format!("{url}: {e}")))?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Checkout backend returned an error status");
        }

        serde_json::from_str(&text)
            .map_err(|e| CheckoutError::Decode(format!("{url} ({status}): {e}")))
    }
}

#[async_trait(?Send)]
impl Gateway for HttpGateway {
    async fn fetch_payment_methods(&self) -> Result<PaymentMethodsResponse> {
        tracing::debug!(url = %self.payment_methods_url, "Fetching payment methods");
        self.call(&self.payment_methods_url, None).await
    }

    async fn initiate_payment(&self, request: &InitiatePaymentRequest) -> Result<GatewayResult> {
        tracing::debug!(url = %self.initiate_payment_url, "Initiating payment");
        let body = serde_json::to_string(request)?;
        self.call(&self.initiate_payment_url, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
    use checkout_core::{CardDetails, ResultCode};

    use super::*;

    /// Requests the stub backend received: (path, content type, body)
    type Received = Arc<Mutex<Vec<(String, String, String)>>>;

    fn content_type(headers: &HeaderMap) -> String {
        headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    async fn payment_methods(
        State(received): State<Received>,
        headers: HeaderMap,
        body: String,
    ) -> Json<serde_json::Value> {
        received.lock().unwrap().push((
            "/api/getPaymentMethods".into(),
            content_type(&headers),
            body,
        ));
        Json(serde_json::json!({
            "paymentMethods": [
                { "type": "scheme", "name": "Credit Card", "brands": ["visa", "mc", "amex"] },
                { "type": "paypal", "name": "PayPal" }
            ]
        }))
    }

    async fn initiate_payment(
        State(received): State<Received>,
        headers: HeaderMap,
        body: String,
    ) -> Json<serde_json::Value> {
        received.lock().unwrap().push((
            "/api/initiatePayment".into(),
            content_type(&headers),
            body,
        ));
        Json(serde_json::json!({ "resultCode": "Authorised", "pspReference": "8815" }))
    }

    async fn not_json() -> &'static str {
        "<html>Internal Server Error</html>"
    }

    /// Stub backend on an ephemeral port; returns its base URL
    async fn spawn_backend(received: Received) -> String {
        let app = Router::new()
            .route("/api/getPaymentMethods", post(payment_methods))
            .route("/api/initiatePayment", post(initiate_payment))
            .route("/broken/getPaymentMethods", post(not_json))
            .with_state(received);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_payment_methods() {
        let received = Received::default();
        let base_url = spawn_backend(received.clone()).await;
        let gateway = HttpGateway::new(&CheckoutConfig::with_base_url(base_url));

        let methods = gateway.fetch_payment_methods().await.unwrap();
        assert_eq!(methods.payment_methods.len(), 2);
        assert!(methods.scheme_method().unwrap().supports_brand("mc"));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].1, "application/json");
        assert!(received[0].2.is_empty(), "methods request has no body");
    }

    #[tokio::test]
    async fn test_initiate_payment_sends_scheme_body() {
        let received = Received::default();
        let base_url = spawn_backend(received.clone()).await;
        let gateway = HttpGateway::new(&CheckoutConfig::with_base_url(base_url));

        let card = CardDetails {
            card_number: "4111111111111111".into(),
            expiry_month: "03".into(),
            expiry_year: "2030".into(),
            cardholder_name: "J. Smith".into(),
            card_security_code: "737".into(),
        };

        let result = gateway
            .initiate_payment(&InitiatePaymentRequest::from(&card))
            .await
            .unwrap();
        assert_eq!(result.result_code, ResultCode::Authorised);
        assert_eq!(result.psp_reference.as_deref(), Some("8815"));

        let received = received.lock().unwrap();
        let body: serde_json::Value = serde_json::from_str(&received[0].2).unwrap();
        assert_eq!(body["paymentMethod"]["type"], "scheme");
        assert_eq!(body["paymentMethod"]["number"], "4111111111111111");
        assert_eq!(body["paymentMethod"]["holderName"], "J. Smith");
        assert_eq!(body["paymentMethod"]["cvc"], "737");
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_decode_error() {
        let base_url = spawn_backend(Received::default()).await;
        let config = CheckoutConfig {
            payment_methods_path: "/broken/getPaymentMethods".into(),
            ..CheckoutConfig::with_base_url(base_url)
        };

        let err = HttpGateway::new(&config)
            .fetch_payment_methods()
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_error() {
        // Bind and drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpGateway::new(&CheckoutConfig::with_base_url(format!("http://{addr}")));
        let err = gateway.fetch_payment_methods().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Network(_)));
    }
}
