//! Terminal checkout
//!
//! Drives the same checkout flow as the browser page against a running
//! backend. The payment sheet is replaced by prompts on stdin, the redirect
//! by a line on stdout.

mod dialog;
mod effects;

use std::rc::Rc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_core::{CheckoutConfig, CheckoutFlow, CheckoutMode};
use checkout_gateway::HttpGateway;

use crate::dialog::TerminalDialogs;
use crate::effects::{PrintNavigator, StderrNotifier};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = CheckoutConfig::from_env()?;
    tracing::info!(
        backend = %config.base_url,
        mode = ?config.mode,
        alternative_method = ?config.alternative_method,
        "Starting checkout"
    );

    let flow = CheckoutFlow::new(
        Rc::new(HttpGateway::new(&config)),
        Rc::new(TerminalDialogs),
        Rc::new(PrintNavigator),
        Rc::new(StderrNotifier),
    )
    .with_alternative_method(config.alternative_method.clone());

    let navigation = match config.mode {
        CheckoutMode::Lazy => flow.checkout().await,
        CheckoutMode::Eager => match flow.prepare().await {
            Some(prepared) => prepared.checkout().await,
            None => None,
        },
    };

    match navigation {
        Some(navigation) => {
            tracing::info!(outcome = %navigation.outcome, "Done");
            Ok(())
        }
        None => std::process::exit(1),
    }
}
