//! Deterministic visual identity for agent types.
//!
//! Every client derives the same icon and color for the same agent type
//! string without any registry or network round-trip. The hash constants and
//! the icon pool below are part of that contract: changing either re-skins
//! every existing agent.

/// djb2 seed.
const HASH_SEED: u32 = 5381;

/// Glyph pool. Order and length are frozen; extend only as a versioned change.
pub const ICON_POOL: [&str; 12] = [
    "🤖", "🧠", "🛠️", "🔍", "📝", "🧪", "📦", "🎯", "🧩", "📊", "🛰️", "⚙️",
];

/// OKLCH lightness and chroma shared by all agent colors.
pub const COLOR_LIGHTNESS: f32 = 0.65;
pub const COLOR_CHROMA: f32 = 0.15;

/// djb2 over Unicode scalar values: `h = h * 33 + c (mod 2^32)`.
pub fn hash(s: &str) -> u32 {
    s.chars()
        .fold(HASH_SEED, |h, c| h.wrapping_mul(33).wrapping_add(c as u32))
}

pub fn icon(agent_type: &str) -> &'static str {
    ICON_POOL[hash(agent_type) as usize % ICON_POOL.len()]
}

pub fn hue(agent_type: &str) -> u16 {
    (hash(agent_type) % 360) as u16
}

/// CSS color for an agent type, e.g. `oklch(0.65 0.15 212)`.
pub fn color(agent_type: &str) -> String {
    format!("oklch({COLOR_LIGHTNESS} {COLOR_CHROMA} {})", hue(agent_type))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStyle {
    pub icon: &'static str,
    pub color: String,
}

pub fn agent_style(agent_type: &str) -> AgentStyle {
    AgentStyle {
        icon: icon(agent_type),
        color: color(agent_type),
    }
}
