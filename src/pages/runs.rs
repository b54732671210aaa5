use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::components::FetchErrorBanner;
use crate::core::hooks::{use_fetch, FetchHook};
use crate::core::models::RunSummary;
use crate::core::services::runs_url;
use crate::features::providers::ProviderStrip;

/// Router path of a run view.
pub fn run_path(run_id: &str) -> String {
    format!("/runs/{}", urlencoding::encode(run_id))
}

#[component]
pub fn Runs() -> impl IntoView {
    let FetchHook { state, refetch } = use_fetch::<Vec<RunSummary>>(|| Some(runs_url()));
    let navigate = use_navigate();
    let run_input = RwSignal::new(String::new());

    let open_run = move |ev: SubmitEvent| {
        ev.prevent_default();
        let id = run_input.get_untracked();
        let id = id.trim();
        if !id.is_empty() {
            navigate(&run_path(id), Default::default());
        }
    };

    let run_list = move || {
        state.with(|s| match &s.data {
            Some(runs) if runs.is_empty() => {
                view! { <p class="empty-log">"No pipeline runs recorded yet"</p> }.into_any()
            }
            Some(runs) => view! {
                <ul class="run-list">
                    {runs
                        .iter()
                        .map(|run| {
                            let id = run.pipeline_run_id.clone();
                            let href = run_path(&id);
                            let stats = format!("{} messages", run.message_count);
                            let last_at = run.last_at.format("%Y-%m-%d %H:%M").to_string();
                            view! {
                                <li class="run-card">
                                    <A href=href>
                                        <span class="run-id">{id}</span>
                                    </A>
                                    <span class="run-stats">{stats}</span>
                                    <time class="run-time">{last_at}</time>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            }
            .into_any(),
            None if s.loading => view! { <p class="loading">"Loading runs..."</p> }.into_any(),
            None => ().into_any(),
        })
    };

    view! {
        <div class="runs-page">
            <header class="runs-header">
                <h1>"Pipeline Trace"</h1>
                <form class="open-run" on:submit=open_run>
                    <input
                        type="text"
                        placeholder="Pipeline run id"
                        prop:value=move || run_input.get()
                        on:input=move |ev| run_input.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn-primary">"Open"</button>
                </form>
            </header>
            <ProviderStrip />
            <FetchErrorBanner
                error=Signal::derive(move || state.with(|s| s.error.clone()))
                on_retry=refetch
            />
            {run_list}
        </div>
    }
}
