use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{AbortHandle, Abortable};

/// Liveness token for a consuming scope (a mounted component, a hook).
///
/// Futures wrapped with [`Lifetime::guard`] are aborted when the scope ends:
/// whatever they were awaiting keeps running elsewhere (a browser fetch is not
/// cancelled) but the code after the await, which is where state gets
/// mutated, never executes.
#[derive(Clone, Default)]
pub struct Lifetime {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    ended: bool,
    next_key: u64,
    pending: HashMap<u64, AbortHandle>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_alive(&self) -> bool {
        !self.lock().ended
    }

    /// Ends the scope, aborting every guarded future still pending.
    pub fn end(&self) {
        let pending: Vec<AbortHandle> = {
            let mut inner = self.lock();
            inner.ended = true;
            inner.pending.drain().map(|(_, handle)| handle).collect()
        };
        for handle in pending {
            handle.abort();
        }
    }

    /// Ties `fut` to this scope. Resolves to `None` if the scope ended first,
    /// including when it had already ended before the call.
    pub fn guard<F: Future>(&self, fut: F) -> impl Future<Output = Option<F::Output>> {
        let (handle, registration) = AbortHandle::new_pair();
        let key = {
            let mut inner = self.lock();
            if inner.ended {
                handle.abort();
                None
            } else {
                let key = inner.next_key;
                inner.next_key += 1;
                inner.pending.insert(key, handle);
                Some(key)
            }
        };
        let lifetime = self.clone();
        async move {
            let output = Abortable::new(fut, registration).await.ok();
            if let Some(key) = key {
                lifetime.lock().pending.remove(&key);
            }
            output
        }
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.lock().pending.len()
    }
}

/// A chain of lifetimes, one per locator a hook has fetched from.
///
/// [`Epochs::advance`] ends the current lifetime and starts a fresh one, so
/// results for a locator the hook has moved away from are dropped. After
/// [`Epochs::close`] every lifetime handed out is already ended.
#[derive(Clone, Default)]
pub struct Epochs {
    inner: Arc<Mutex<EpochsInner>>,
}

#[derive(Default)]
struct EpochsInner {
    current: Lifetime,
    closed: bool,
}

impl Epochs {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EpochsInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Lifetime {
        self.lock().current.clone()
    }

    pub fn advance(&self) -> Lifetime {
        let mut inner = self.lock();
        inner.current.end();
        if !inner.closed {
            inner.current = Lifetime::new();
        }
        inner.current.clone()
    }

    pub fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.current.end();
    }
}
