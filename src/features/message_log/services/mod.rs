pub mod matching;
pub mod roles;
pub mod threads;

pub use matching::message_matches;
pub use roles::roles_by_agent;
pub use threads::{phase_sections, thread_entries, PhaseSection, ThreadEntry};
