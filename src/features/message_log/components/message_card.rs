use leptos::prelude::*;

use crate::core::identity::agent_style;
use crate::core::models::AgentMessage;

const MAX_INDENT: usize = 6;

#[component]
pub fn MessageCard(
    message: AgentMessage,
    depth: usize,
    /// Role the recipient has used as a sender, when known.
    recipient_role: Option<String>,
) -> impl IntoView {
    let sender = agent_style(&message.from_role);
    let recipient = match (message.to_agent.clone(), recipient_role) {
        (Some(agent), Some(role)) => {
            let style = agent_style(&role);
            view! {
                <span class="agent-chip" style=format!("border-color: {}", style.color)>
                    {style.icon} " " {agent}
                </span>
            }
            .into_any()
        }
        (Some(agent), None) => view! { <span class="agent-chip unstyled">{agent}</span> }.into_any(),
        (None, _) => view! { <span class="agent-chip broadcast">"all"</span> }.into_any(),
    };
    let indent = format!(
        "margin-left: {}rem; border-left-color: {}",
        depth.min(MAX_INDENT) as f32 * 1.5,
        sender.color
    );
    let is_reply = depth > 0;
    let type_class = format!("message-type type-{}", message.message_type);
    let time = message.created_at.format("%H:%M:%S").to_string();
    let content = message.content_text();

    view! {
        <article class="message-card" class:reply=is_reply style=indent>
            <header class="message-header">
                <span class="agent-chip" style=format!("border-color: {}", sender.color)>
                    {sender.icon} " " {message.from_agent}
                </span>
                <span class="message-role">{message.from_role}</span>
                <span class="message-arrow">"→"</span>
                {recipient}
                <span class=type_class>{message.message_type}</span>
                <time class="message-time">{time}</time>
            </header>
            <pre class="message-content">{content}</pre>
        </article>
    }
}
