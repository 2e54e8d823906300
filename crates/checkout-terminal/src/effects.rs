//! Terminal stand-ins for the redirect and the alert box

use checkout_core::{Navigator, Notifier, ResultTarget, Result};

/// Prints the result page the browser would load
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, target: ResultTarget) -> Result<()> {
        println!("{target}");
        Ok(())
    }
}

pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("\n!! {message}");
    }
}
