use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;

use crate::core::services::{get_json, FetchError};
use crate::core::sync::{Epochs, FetchState, Lifetime};

pub struct FetchHook<T: Send + Sync + 'static> {
    pub state: ReadSignal<FetchState<T>>,
    /// Issues a new fetch for the current URL. Each call is independent.
    pub refetch: Arc<dyn Fn() + Send + Sync>,
}

/// Fetches JSON from the URL returned by `url`, again whenever it changes.
///
/// Returning `None` disables fetching and clears the state. Results for a URL
/// the hook has moved away from, or landing after the calling scope is
/// disposed, are dropped.
pub fn use_fetch<T>(url: impl Fn() -> Option<String> + Send + Sync + 'static) -> FetchHook<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    use_fetch_with(url, |url: String| async move { get_json::<T>(&url).await })
}

/// [`use_fetch`] over an arbitrary `fetcher`.
pub fn use_fetch_with<T, F, Fut>(
    url: impl Fn() -> Option<String> + Send + Sync + 'static,
    fetcher: F,
) -> FetchHook<T>
where
    T: Send + Sync + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + 'static,
{
    let state = RwSignal::new(FetchState::<T>::idle());
    let epochs = Epochs::new();
    let fetcher = Arc::new(fetcher);
    let url = Memo::new(move |_| url());

    {
        let epochs = epochs.clone();
        let fetcher = fetcher.clone();
        Effect::new(move |_| {
            let url = url.get();
            let epoch = epochs.advance();
            match url {
                Some(url) => dispatch(url, state, &epoch, fetcher.as_ref()),
                None => state.update(FetchState::disable),
            }
        });
    }

    let refetch = {
        let epochs = epochs.clone();
        Arc::new(move || {
            if let Some(url) = url.get_untracked() {
                dispatch(url, state, &epochs.current(), fetcher.as_ref());
            }
        }) as Arc<dyn Fn() + Send + Sync>
    };

    on_cleanup(move || epochs.close());

    FetchHook {
        state: state.read_only(),
        refetch,
    }
}

fn dispatch<T, F, Fut>(url: String, state: RwSignal<FetchState<T>>, epoch: &Lifetime, fetcher: &F)
where
    T: Send + Sync + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, FetchError>> + 'static,
{
    if !epoch.is_alive() {
        return;
    }
    state.update(FetchState::begin);
    let request = fetcher(url.clone());
    let fetch = epoch.guard(async move {
        let result = request.await;
        if let Err(e) = &result {
            leptos::logging::error!("Failed to fetch {}: {}", url, e);
        }
        state.update(|s| s.settle(result));
    });
    spawn_local(async move {
        fetch.await;
    });
}
