//! # checkout-core
//!
//! Payment Request checkout flow: gateway method filtering, the native
//! payment dialog seam and result-code routing.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          CheckoutFlow                             │
//! │  ┌───────────┐  ┌──────────────┐  ┌────────────┐  ┌───────────┐  │
//! │  │  Gateway  │─▶│ request data │─▶│  Payment   │─▶│  Result   │  │
//! │  │ (methods) │  │  + cart      │  │  Dialog    │  │  routing  │  │
//! │  └───────────┘  └──────────────┘  └────────────┘  └───────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Gateway`, `DialogFactory`/`PaymentDialog`, `Navigator` and `Notifier` are
//! the seams: the browser front end plugs in `PaymentRequest` and
//! `window.location`, the terminal binary plugs in stdin and stdout.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::CheckoutFlow;
//!
//! let flow = CheckoutFlow::new(gateway, dialogs, navigator, notifier);
//!
//! // Lazy: everything happens inside the trigger
//! let navigation = flow.checkout().await;
//!
//! // Eager: build the dialog up front, show it on the trigger
//! if let Some(prepared) = flow.prepare().await {
//!     prepared.checkout().await;
//! }
//! ```

pub mod config;
pub mod dialog;
pub mod error;
pub mod flow;
pub mod gateway;
pub mod methods;
pub mod request;
pub mod routing;

pub use config::{CheckoutConfig, CheckoutMode};
pub use dialog::{
    AlternativeMethodToken, CardDetails, CompletionOutcome, DialogFactory, PaymentDetails,
    PaymentDialog,
};
pub use error::{CheckoutError, Result};
pub use flow::{CheckoutFlow, CheckoutSession, CheckoutStage, Navigator, Notifier, PreparedCheckout};
pub use gateway::{Gateway, InitiatePaymentRequest, SchemePaymentMethod};
pub use methods::{PaymentMethod, PaymentMethodsResponse, supported_networks};
pub use request::{
    ShoppingCartDetails, SupportedPaymentMethodData, build_shopping_cart_details,
    build_supported_payment_method_data,
};
pub use routing::{GatewayResult, Navigation, ResultCode, ResultTarget, route};
