pub mod message;
pub mod provider;
pub mod run;

pub use message::{AgentMessage, MessageList};
pub use provider::ProviderStatus;
pub use run::RunSummary;
