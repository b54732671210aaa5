use std::time::Duration;

use leptos::prelude::*;

use crate::core::sync::{BrowserInterval, IntervalSource, PollingLoop};

/// Calls `action` now and every `period` for as long as the calling scope lives.
pub fn use_polling(period: Duration, action: impl FnMut() + 'static) {
    use_polling_with(&BrowserInterval, period, action);
}

pub fn use_polling_with<S>(source: &S, period: Duration, action: impl FnMut() + 'static)
where
    S: IntervalSource,
    S::Guard: 'static,
{
    let poller = StoredValue::new_local(PollingLoop::start(source, period, action));
    on_cleanup(move || {
        poller.try_update_value(PollingLoop::stop);
    });
}
