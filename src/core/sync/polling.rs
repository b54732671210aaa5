use std::time::Duration;

/// Something that can call a closure on a fixed wall-clock period.
///
/// The returned guard owns the schedule: dropping it stops future ticks.
pub trait IntervalSource {
    type Guard;

    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> Self::Guard;
}

/// `setInterval` via gloo-timers.
pub struct BrowserInterval;

impl IntervalSource for BrowserInterval {
    type Guard = gloo_timers::callback::Interval;

    fn every(&self, period: Duration, tick: Box<dyn FnMut()>) -> Self::Guard {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::callback::Interval::new(millis, tick)
    }
}

/// Runs an action immediately, then once per period until stopped or dropped.
///
/// Ticks are not serialized against slow actions: if an async action outlives
/// the period, invocations overlap. Stopping cancels future ticks only;
/// anything the action already started must check its own liveness.
pub struct PollingLoop<G> {
    guard: Option<G>,
}

impl<G> PollingLoop<G> {
    pub fn start<S>(source: &S, period: Duration, mut action: impl FnMut() + 'static) -> Self
    where
        S: IntervalSource<Guard = G>,
    {
        action();
        let guard = source.every(period, Box::new(action));
        Self { guard: Some(guard) }
    }

    pub fn stop(&mut self) {
        self.guard.take();
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.guard.is_some()
    }
}
