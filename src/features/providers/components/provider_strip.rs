use leptos::prelude::*;

use crate::features::providers::hooks::{use_provider_availability, ProviderAvailabilityHook};

#[component]
pub fn ProviderStrip() -> impl IntoView {
    let ProviderAvailabilityHook {
        providers,
        unavailable,
        any_available,
        recheck,
    } = use_provider_availability();

    let none_available = move || !any_available.get() && !providers.with(Vec::is_empty);

    view! {
        <div class="provider-strip">
            <Show when=none_available>
                <div class="provider-banner">"No agent provider is available. Runs cannot start."</div>
            </Show>
            <ul class="provider-list">
                {move || {
                    providers
                        .get()
                        .into_iter()
                        .map(|p| {
                            let title = p.reason.clone().unwrap_or_default();
                            view! {
                                <li class="provider" class:available=p.available title=title>
                                    {p.name}
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            {move || {
                let missing = unavailable.get();
                (!missing.is_empty())
                    .then(|| {
                        view! {
                            <details class="provider-reasons">
                                <summary>{format!("{} unavailable", missing.len())}</summary>
                                <ul>
                                    {missing
                                        .into_iter()
                                        .map(|p| {
                                            let reason = p.reason.unwrap_or_else(|| "unavailable".into());
                                            view! { <li>{format!("{}: {}", p.name, reason)}</li> }
                                        })
                                        .collect_view()}
                                </ul>
                            </details>
                        }
                    })
            }}
            <button class="btn-secondary" on:click=move |_| recheck()>"Recheck"</button>
        </div>
    }
}
