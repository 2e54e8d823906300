//! # checkout-gateway
//!
//! `reqwest` implementation of [`checkout_core::Gateway`] against the
//! merchant backend (`/api/getPaymentMethods`, `/api/initiatePayment`).
//!
//! The same client compiles for native targets and for `wasm32` (where
//! reqwest delegates to the browser's `fetch`).

mod http;

pub use http::HttpGateway;
