use crate::core::models::AgentMessage;

/// Case-insensitive substring match over the fields a reader scans for:
/// agents, role, type, phase and the rendered content.
pub fn message_matches(message: &AgentMessage, query: &str) -> bool {
    let needle = query.to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&needle);

    hit(&message.from_agent)
        || hit(&message.from_role)
        || message.to_agent.as_deref().is_some_and(hit)
        || hit(&message.message_type)
        || hit(&message.phase)
        || hit(&message.content_text())
}
