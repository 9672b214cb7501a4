use dashmap::DashSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RESPONSE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of one in-flight response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseId(u64);

impl ResponseId {
    pub fn next() -> Self {
        Self(NEXT_RESPONSE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Which responses already carry the loader script.
#[derive(Debug, Default)]
pub struct LoaderRegistry {
    claimed: DashSet<ResponseId>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True for the first caller per response: that render must emit the loader.
    pub fn claim(&self, response: ResponseId) -> bool {
        self.claimed.insert(response)
    }

    pub fn has_loader(&self, response: ResponseId) -> bool {
        self.claimed.contains(&response)
    }

    /// Forget a finished response.
    pub fn release(&self, response: ResponseId) {
        self.claimed.remove(&response);
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
