//! Unique joke fetcher
//!
//! Pulls jokes from a source one request at a time until the requested number
//! of jokes nobody has seen yet has been collected. Duplicates are skipped and
//! do not count; any source error ends the fetch with nothing returned.
//!
//! ```text
//! Idle -> Requesting -> Accepted | DuplicateDiscarded -> ... -> Done
//!         Requesting -> Failed
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::models::Joke;
use crate::source::JokeSource;

/// Shared flag for cooperative cancellation. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bounds on a single fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Requests allowed, duplicates included
    pub max_attempts: u32,
    /// Wall-clock budget, unbounded if `None`
    pub max_elapsed: Option<Duration>,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            max_elapsed: Some(Duration::from_secs(60)),
        }
    }
}

/// Collects unique jokes from a [`JokeSource`]
pub struct JokeFetcher<J: JokeSource> {
    source: J,
    limits: FetchLimits,
}

impl<J: JokeSource> JokeFetcher<J> {
    pub fn new(source: J) -> Self {
        Self {
            source,
            limits: FetchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn source(&self) -> &J {
        &self.source
    }

    pub fn limits(&self) -> FetchLimits {
        self.limits
    }

    /// Fetch exactly `target` jokes whose text is neither `is_seen` nor
    /// repeated within this batch.
    pub async fn fetch_unique<F>(
        &self,
        target: usize,
        is_seen: F,
        cancel: &CancellationFlag,
    ) -> Result<Vec<Joke>, FetchError>
    where
        F: Fn(&str) -> bool,
    {
        let started = Instant::now();
        let mut accepted: Vec<Joke> = Vec::with_capacity(target);
        let mut batch_seen: HashSet<String> = HashSet::new();
        let mut attempts: u32 = 0;

        while accepted.len() < target {
            if cancel.is_cancelled() {
                debug!(accepted = accepted.len(), target, "Fetch cancelled");
                return Err(FetchError::Cancelled {
                    accepted: accepted.len(),
                    target,
                });
            }

            let out_of_time = self
                .limits
                .max_elapsed
                .is_some_and(|budget| started.elapsed() >= budget);
            if attempts >= self.limits.max_attempts || out_of_time {
                debug!(attempts, accepted = accepted.len(), target, "Fetch budget exhausted");
                return Err(FetchError::Exhausted {
                    attempts,
                    accepted: accepted.len(),
                    target,
                });
            }

            attempts += 1;
            debug!(attempt = attempts, "Requesting joke");
            let text = self.source.next_joke().await.map_err(|e| {
                debug!(attempt = attempts, error = %e, "Fetch failed");
                e
            })?;

            if is_seen(&text) || batch_seen.contains(&text) {
                info!(text = %text, "Found a duplicate joke");
                continue;
            }

            batch_seen.insert(text.clone());
            accepted.push(Joke::new(text));
            debug!(accepted = accepted.len(), target, "Joke accepted");
        }

        debug!(attempts, target, "Fetch done");
        Ok(accepted)
    }
}
