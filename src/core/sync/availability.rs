use crate::core::models::ProviderStatus;
use crate::core::services::FetchError;

/// Last known provider list. Derived views are computed on every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderAvailability {
    providers: Vec<ProviderStatus>,
}

impl ProviderAvailability {
    pub fn providers(&self) -> &[ProviderStatus] {
        &self.providers
    }

    pub fn unavailable(&self) -> Vec<ProviderStatus> {
        self.providers.iter().filter(|p| !p.available).cloned().collect()
    }

    pub fn any_available(&self) -> bool {
        self.providers.iter().any(|p| p.available)
    }

    /// Applies a poll result. Failures keep the last known list and return the
    /// error back for logging.
    pub fn apply(&mut self, result: Result<Vec<ProviderStatus>, FetchError>) -> Option<FetchError> {
        match result {
            Ok(providers) => {
                self.providers = providers;
                None
            }
            Err(e) => Some(e),
        }
    }
}
