pub mod availability;
pub mod fetch_state;
pub mod lifetime;
pub mod polling;
pub mod search;

pub use availability::ProviderAvailability;
pub use fetch_state::{FetchPhase, FetchState};
pub use lifetime::{Epochs, Lifetime};
pub use polling::{BrowserInterval, IntervalSource, PollingLoop};
pub use search::filter_by_query;

#[cfg(test)]
pub use polling::testing;
