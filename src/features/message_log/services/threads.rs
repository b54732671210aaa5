use std::collections::HashMap;

use crate::core::models::AgentMessage;

/// A message placed in the rendered thread order.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub message: AgentMessage,
    pub depth: usize,
}

/// A run of consecutive entries sharing one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSection {
    pub phase: String,
    pub entries: Vec<ThreadEntry>,
}

/// Orders messages depth-first along `parentId` links, keeping the incoming
/// (chronological) order among siblings and among roots.
///
/// A message becomes a root when it has no parent, when its parent is not in
/// `messages`, or when following parents leads back to itself. Every message
/// appears exactly once.
pub fn thread_entries(messages: &[AgentMessage]) -> Vec<ThreadEntry> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(messages.len());
    for (i, message) in messages.iter().enumerate() {
        index.entry(message.id.as_str()).or_insert(i);
    }

    let parents: Vec<Option<usize>> = messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            message
                .parent_id
                .as_deref()
                .and_then(|id| index.get(id).copied())
                .filter(|&p| p != i)
        })
        .collect();

    let on_cycle = |start: usize| {
        let mut current = parents[start];
        for _ in 0..messages.len() {
            match current {
                Some(p) if p == start => return true,
                Some(p) => current = parents[p],
                None => return false,
            }
        }
        false
    };

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); messages.len()];
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) if !on_cycle(i) => children[*p].push(i),
            _ => roots.push(i),
        }
    }

    let mut entries = Vec::with_capacity(messages.len());
    let mut stack: Vec<(usize, usize)> = roots.into_iter().rev().map(|i| (i, 0)).collect();
    while let Some((i, depth)) = stack.pop() {
        entries.push(ThreadEntry {
            message: messages[i].clone(),
            depth,
        });
        stack.extend(children[i].iter().rev().map(|&c| (c, depth + 1)));
    }
    entries
}

/// Splits entries into sections wherever the phase changes.
pub fn phase_sections(entries: Vec<ThreadEntry>) -> Vec<PhaseSection> {
    let mut sections: Vec<PhaseSection> = Vec::new();
    for entry in entries {
        match sections.last_mut() {
            Some(section) if section.phase == entry.message.phase => section.entries.push(entry),
            _ => sections.push(PhaseSection {
                phase: entry.message.phase.clone(),
                entries: vec![entry],
            }),
        }
    }
    sections
}
