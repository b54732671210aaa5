use std::collections::HashMap;

use leptos::prelude::*;

use crate::core::models::AgentMessage;
use crate::features::message_log::components::MessageCard;
use crate::features::message_log::services::{phase_sections, thread_entries};

/// Threaded log grouped into phase sections.
#[component]
pub fn MessageList(
    #[prop(into)] messages: Signal<Vec<AgentMessage>>,
    /// Sender role per agent id, used to style recipients.
    #[prop(into)]
    roles: Signal<HashMap<String, String>>,
) -> impl IntoView {
    move || {
        let sections = messages.with(|messages| phase_sections(thread_entries(messages)));
        if sections.is_empty() {
            return view! {
                <div class="empty-log">
                    <p>"No messages"</p>
                </div>
            }
            .into_any();
        }

        view! {
            <div class="message-list">
                {sections
                    .into_iter()
                    .map(|section| {
                        view! {
                            <section class="phase-section">
                                <h3 class="phase-title">{section.phase}</h3>
                                {section
                                    .entries
                                    .into_iter()
                                    .map(|entry| {
                                        let recipient_role = entry
                                            .message
                                            .to_agent
                                            .as_ref()
                                            .and_then(|agent| roles.with(|roles| roles.get(agent).cloned()));
                                        view! {
                                            <MessageCard
                                                message=entry.message
                                                depth=entry.depth
                                                recipient_role=recipient_role
                                            />
                                        }
                                    })
                                    .collect_view()}
                            </section>
                        }
                    })
                    .collect_view()}
            </div>
        }
        .into_any()
    }
}
