use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::pages::{RunView, Runs};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p class="not-found">"Page not found"</p> }>
                    <Route path=path!("/") view=Runs />
                    <Route path=path!("/runs/:run_id") view=RunView />
                </Routes>
            </main>
        </Router>
    }
}
