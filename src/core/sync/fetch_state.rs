use crate::core::services::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

/// Loading/error/data triple behind `use_fetch`.
///
/// Failed fetches keep previously loaded data visible; only a disabled
/// locator clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn idle() -> Self {
        Self::default()
    }

    /// No locator: not loading, no data, no error, and nothing requested.
    pub fn disable(&mut self) {
        *self = Self::default();
    }

    pub fn begin(&mut self) {
        self.loading = true;
    }

    pub fn settle(&mut self, result: Result<T, FetchError>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(error) => self.error = Some(error),
        }
    }

    pub fn phase(&self) -> FetchPhase {
        if self.loading {
            FetchPhase::Loading
        } else if self.error.is_some() {
            FetchPhase::Failure
        } else if self.data.is_some() {
            FetchPhase::Success
        } else {
            FetchPhase::Idle
        }
    }
}
