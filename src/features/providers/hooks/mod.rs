pub mod use_provider_availability;

pub use use_provider_availability::{use_provider_availability, ProviderAvailabilityHook};
