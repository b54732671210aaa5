pub mod provider_strip;

pub use provider_strip::ProviderStrip;
