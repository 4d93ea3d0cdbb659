//! Guard against out-of-order responses.
//!
//! When several requests for the same view are in flight, only the result of
//! the most recently issued one may become visible. Each request takes a
//! [`RequestToken`] before it starts; completing with a token that is no
//! longer the latest is a no-op.

use log::debug;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ticket identifying one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

struct Slot<T> {
    applied: u64,
    value: Option<Arc<T>>,
}

/// Holds the value of the latest completed request
pub struct LatestResponse<T> {
    issued: AtomicU64,
    slot: Mutex<Slot<T>>,
}

impl<T> Default for LatestResponse<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestResponse<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: Mutex::new(Slot {
                applied: 0,
                value: None,
            }),
        }
    }

    /// Issue a token for a new request, superseding all earlier ones
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` still belongs to the latest issued request
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.issued.load(Ordering::SeqCst)
    }

    /// Store the result of the request behind `token`
    ///
    /// Returns `false` and drops `value` when a newer request was issued in
    /// the meantime.
    pub fn complete(&self, token: RequestToken, value: T) -> bool {
        let mut slot = self.slot.lock();
        if !self.is_current(token) || token.0 <= slot.applied {
            debug!(
                "Dropping stale response {} (latest issued {})",
                token.0,
                self.issued.load(Ordering::SeqCst)
            );
            return false;
        }
        slot.applied = token.0;
        slot.value = Some(Arc::new(value));
        true
    }

    /// Value of the latest accepted response
    pub fn current(&self) -> Option<Arc<T>> {
        self.slot.lock().value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_latest_response_wins() {
        let guard = LatestResponse::new();
        let first = guard.begin();
        let second = guard.begin();

        assert!(!guard.is_current(first));
        assert!(guard.complete(second, "second"));
        assert!(!guard.complete(first, "first"));
        assert_eq!(guard.current().as_deref(), Some(&"second"));
    }

    #[test]
    fn test_token_completes_once() {
        let guard = LatestResponse::new();
        let token = guard.begin();
        assert!(guard.complete(token, 1));
        assert!(!guard.complete(token, 2));
        assert_eq!(guard.current().as_deref(), Some(&1));
    }

    #[test]
    fn test_empty_until_completed() {
        let guard: LatestResponse<u32> = LatestResponse::default();
        assert!(guard.current().is_none());
        let token = guard.begin();
        assert_eq!(token.id(), 1);
        assert!(guard.current().is_none());
    }

    #[test]
    fn test_concurrent_requests() {
        let guard = Arc::new(LatestResponse::new());
        let tokens: Vec<RequestToken> = (0..8).map(|_| guard.begin()).collect();
        let last = *tokens.last().unwrap();

        let handles: Vec<_> = tokens
            .into_iter()
            .map(|token| {
                let guard = Arc::clone(&guard);
                thread::spawn(move || guard.complete(token, token.id()))
            })
            .collect();

        let accepted: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(accepted, 1);
        assert_eq!(guard.current().as_deref(), Some(&last.id()));
    }
}
