use std::sync::Arc;

use leptos::prelude::*;

use crate::core::services::FetchError;

/// Inline error with a Retry button; renders nothing while `error` is `None`.
#[component]
pub fn FetchErrorBanner(
    #[prop(into)] error: Signal<Option<FetchError>>,
    on_retry: Arc<dyn Fn() + Send + Sync>,
) -> impl IntoView {
    move || {
        error.get().map(|e| {
            let on_retry = on_retry.clone();
            let hint = if e.is_client_error() {
                "The server rejected the request."
            } else {
                "Showing the last loaded data, if any."
            };
            view! {
                <div class="fetch-error" role="alert">
                    <span class="error-message">{e.to_string()}</span>
                    <span class="error-hint">{hint}</span>
                    <button class="btn-secondary" on:click=move |_| on_retry()>"Retry"</button>
                </div>
            }
        })
    }
}
