use std::collections::HashMap;

use crate::core::models::AgentMessage;

/// Maps each sending agent to the first role it sent under.
///
/// Recipients only carry an agent id, so this is how a recipient gets the same
/// visual identity it has as a sender.
pub fn roles_by_agent(messages: &[AgentMessage]) -> HashMap<String, String> {
    let mut roles = HashMap::new();
    for message in messages {
        roles
            .entry(message.from_agent.clone())
            .or_insert_with(|| message.from_role.clone());
    }
    roles
}
