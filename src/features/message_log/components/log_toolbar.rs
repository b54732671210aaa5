use std::sync::Arc;

use leptos::prelude::*;

/// Search box, agent filter, live toggle and manual refresh.
#[component]
pub fn LogToolbar(
    query: RwSignal<String>,
    agent: RwSignal<Option<String>>,
    #[prop(into)] agents: Signal<Vec<String>>,
    live: RwSignal<bool>,
    on_refresh: Arc<dyn Fn() + Send + Sync>,
) -> impl IntoView {
    view! {
        <div class="log-toolbar">
            <input
                type="search"
                class="log-search"
                placeholder="Search messages..."
                prop:value=move || query.get()
                on:input=move |ev| query.set(event_target_value(&ev))
            />
            <select
                class="agent-filter"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    agent.set((!value.is_empty()).then_some(value));
                }
            >
                <option value="" selected=move || agent.with(Option::is_none)>"All agents"</option>
                {move || {
                    agents
                        .get()
                        .into_iter()
                        .map(|name| {
                            let selected = {
                                let name = name.clone();
                                move || agent.with(|a| a.as_deref() == Some(name.as_str()))
                            };
                            let label = name.clone();
                            view! { <option value=name selected=selected>{label}</option> }
                        })
                        .collect_view()
                }}
            </select>
            <label class="live-toggle">
                <input
                    type="checkbox"
                    prop:checked=move || live.get()
                    on:change=move |ev| live.set(event_target_checked(&ev))
                />
                " Live"
            </label>
            <button class="btn-secondary" on:click=move |_| on_refresh()>"Refresh"</button>
        </div>
    }
}
