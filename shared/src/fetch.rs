//! State behind the data hooks.
//!
//! A hook may have several requests in flight when its parameters change
//! quickly. Each request is tagged with a sequence number and only the
//! response carrying the latest number is applied.

use crate::error::ApiError;

/// Monotonic request counter, one per hook instance.
#[derive(Debug, Clone, Default)]
pub struct FetchSequencer {
    last: u64,
}

impl FetchSequencer {
    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    pub fn latest(&self) -> u64 {
        self.last
    }
}

/// Data, loading flag and last error of one remote resource.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<ApiError>,
    current: u64,
}

impl<T: Default> Default for FetchState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> FetchState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            data: initial,
            loading: false,
            error: None,
            current: 0,
        }
    }

    /// Request `seq` was sent; it supersedes anything older.
    pub fn start(&mut self, seq: u64) {
        if seq < self.current {
            return;
        }
        self.current = seq;
        self.loading = true;
    }

    /// Apply the outcome of request `seq`. Returns `false` when the response
    /// was stale and ignored.
    ///
    /// A failure keeps the previous data around.
    pub fn finish(&mut self, seq: u64, outcome: Result<T, ApiError>) -> bool {
        if seq != self.current {
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(data) => {
                self.data = data;
                self.error = None;
            }
            Err(error) => self.error = Some(error),
        }
        true
    }

    pub fn current_seq(&self) -> u64 {
        self.current
    }
}

/// Shared loading/error flags for imperative create/update/delete calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    in_flight: u32,
    pub error: Option<ApiError>,
}

impl MutationState {
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    pub fn end(&mut self, error: Option<ApiError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if error.is_some() {
            self.error = error;
        }
    }

    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }
}
