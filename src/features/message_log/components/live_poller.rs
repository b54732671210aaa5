use std::sync::Arc;
use std::time::Duration;

use leptos::prelude::*;

use crate::core::hooks::use_polling;

pub const LIVE_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Re-runs `refetch` while mounted.
#[component]
pub fn LivePoller(refetch: Arc<dyn Fn() + Send + Sync>) -> impl IntoView {
    use_polling(LIVE_POLL_INTERVAL, move || refetch());
    view! { <span class="live-indicator">"● live"</span> }
}
