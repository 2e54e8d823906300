//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::CheckoutPage;

/// Root application component
///
/// Result pages (`/result/...`) are served by the backend; the sheet
/// redirects there with a full page load.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=CheckoutPage />
                    <Route path=path!("/checkout") view=CheckoutPage />
                </Routes>
            </main>
        </Router>
    }
}
