use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::hooks::use_polling_with;
use crate::core::models::ProviderStatus;
use crate::core::services::{get_json, providers_url, FetchError, ProviderFetchMode};
use crate::core::sync::{BrowserInterval, IntervalSource, Lifetime, ProviderAvailability};

pub const PROVIDER_POLL_INTERVAL: Duration = Duration::from_secs(60);

pub struct ProviderAvailabilityHook {
    pub providers: Signal<Vec<ProviderStatus>>,
    pub unavailable: Signal<Vec<ProviderStatus>>,
    pub any_available: Signal<bool>,
    /// Forces the server to re-probe instead of answering from its cache.
    pub recheck: Arc<dyn Fn() + Send + Sync>,
}

/// Polls `/api/providers` while the calling scope is mounted.
///
/// A failed poll is logged and the last known list stays in place.
pub fn use_provider_availability() -> ProviderAvailabilityHook {
    use_provider_availability_with(&BrowserInterval, |mode| async move {
        get_json::<Vec<ProviderStatus>>(&providers_url(mode)).await
    })
}

pub fn use_provider_availability_with<S, F, Fut>(source: &S, fetcher: F) -> ProviderAvailabilityHook
where
    S: IntervalSource,
    S::Guard: 'static,
    F: Fn(ProviderFetchMode) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<ProviderStatus>, FetchError>> + 'static,
{
    let availability = RwSignal::new(ProviderAvailability::default());
    let lifetime = Lifetime::new();
    let fetcher = Arc::new(fetcher);

    let fetch = {
        let lifetime = lifetime.clone();
        move |mode: ProviderFetchMode| {
            if !lifetime.is_alive() {
                return;
            }
            let request = fetcher(mode);
            let poll = lifetime.guard(async move {
                let result = request.await;
                if let Some(e) = availability.try_update(|a| a.apply(result)).flatten() {
                    leptos::logging::warn!("Provider check failed: {}", e);
                }
            });
            spawn_local(async move {
                poll.await;
            });
        }
    };

    use_polling_with(source, PROVIDER_POLL_INTERVAL, {
        let fetch = fetch.clone();
        move || fetch(ProviderFetchMode::Routine)
    });

    on_cleanup(move || lifetime.end());

    ProviderAvailabilityHook {
        providers: Signal::derive(move || availability.with(|a| a.providers().to_vec())),
        unavailable: Signal::derive(move || availability.with(ProviderAvailability::unavailable)),
        any_available: Signal::derive(move || availability.with(ProviderAvailability::any_available)),
        recheck: Arc::new(move || fetch(ProviderFetchMode::Refresh)),
    }
}
