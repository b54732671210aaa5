use std::borrow::Cow;
use std::collections::BTreeSet;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::components::FetchErrorBanner;
use crate::core::hooks::{use_fetch, use_search_filter, FetchHook};
use crate::core::models::MessageList as MessagePage;
use crate::core::services::messages_url;
use crate::core::sync::FetchPhase;
use crate::features::message_log::{message_matches, roles_by_agent, LivePoller, LogToolbar, MessageList};
use crate::features::providers::ProviderStrip;

fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

#[component]
pub fn RunView() -> impl IntoView {
    let params = use_params_map();
    let run_id = Memo::new(move |_| {
        params.with(|p| p.get("run_id").map(|id| decode_param(&id)).unwrap_or_default())
    });
    let agent = RwSignal::new(None::<String>);
    let live = RwSignal::new(false);

    let FetchHook { state, refetch } =
        use_fetch::<MessagePage>(move || messages_url(&run_id.get(), agent.get().as_deref()));

    let messages = Signal::derive(move || {
        state.with(|s| s.data.as_ref().map(|page| page.messages.clone()).unwrap_or_default())
    });
    let search = use_search_filter(messages, message_matches);
    let roles = Memo::new(move |_| messages.with(|messages| roles_by_agent(messages)));

    let agents = Signal::derive(move || {
        let mut names: BTreeSet<String> = messages.with(|messages| {
            messages
                .iter()
                .flat_map(|m| std::iter::once(m.from_agent.clone()).chain(m.to_agent.clone()))
                .collect()
        });
        if let Some(selected) = agent.get() {
            names.insert(selected);
        }
        names.into_iter().collect::<Vec<_>>()
    });

    let total = move || {
        state.with(|s| {
            s.data
                .as_ref()
                .map(|page| format!("{} messages", page.total))
                .unwrap_or_default()
        })
    };
    let live_refetch = refetch.clone();

    view! {
        <div class="run-view">
            <header class="run-header">
                <A href="/">"← Runs"</A>
                <h2 class="run-title">{move || run_id.get()}</h2>
                <span class="message-total">{total}</span>
                <Show when=move || state.with(|s| s.phase() == FetchPhase::Loading)>
                    <span class="loading-dot">"loading"</span>
                </Show>
            </header>
            <ProviderStrip />
            <LogToolbar
                query=search.query
                agent=agent
                agents=agents
                live=live
                on_refresh=refetch.clone()
            />
            <Show when=move || live.get()>
                <LivePoller refetch=live_refetch.clone() />
            </Show>
            <FetchErrorBanner
                error=Signal::derive(move || state.with(|s| s.error.clone()))
                on_retry=refetch
            />
            <MessageList messages=search.filtered roles=roles />
        </div>
    }
}
