//! Bounded fan-out over independent identifiers
//!
//! Up to `max_workers` fetches are in flight at once. Results are consumed in
//! completion order by a single consumer that owns the aggregate, so no
//! locking is needed around it. Before returning, records are regrouped by
//! the identifier's submission position, which makes the output independent
//! of how the requests happened to be scheduled.
//!
//! A failed fetch never aborts the batch. It is recorded as a
//! [`FetchFailure`] next to the successful records and the caller decides
//! whether partial results are good enough.

use crate::config::FanOutConfig;
use crate::error::{Error, FetchFailure, Result};
use futures::stream::{self, StreamExt};
use std::fmt::Display;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};


/// Outcome of a fan-out run
#[derive(Debug)]
pub struct FanOutReport<I, R> {
    /// Selected records, grouped by identifier in submission order
    pub records: Vec<R>,
    /// Identifiers whose fetch failed, in submission order
    pub failures: Vec<FetchFailure<I>>,
    /// Number of fetches that finished (successfully or not) before the run ended
    pub completed: usize,
    /// Whether an early-abort predicate stopped the run
    pub aborted: bool,
}

impl<I, R> FanOutReport<I, R> {
    /// Whether every identifier was fetched successfully
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }
}

/// Bounded fan-out runner
#[derive(Clone, Debug)]
pub struct FanOut {
    max_workers: usize,
    early_abort: bool,
    cancel_token: CancellationToken,
}

impl FanOut {
    /// Create a runner from configuration
    pub fn new(config: &FanOutConfig) -> Self {
        Self {
            max_workers: config.max_workers,
            early_abort: config.early_abort,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Create a runner with the given worker cap and early abort disabled
    pub fn with_workers(max_workers: usize) -> Self {
        Self::new(&FanOutConfig {
            max_workers,
            early_abort: false,
        })
    }

    /// Use an externally owned cancellation token (e.g. one cancelled on Ctrl-C)
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Worker cap
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Fetch every identifier and keep what `select` returns for each result
    ///
    /// `select` receives each successful result as it completes and returns
    /// the records to keep for that identifier (possibly none). It must only
    /// look at the result it is given: the final output is then the same for
    /// every completion order.
    ///
    /// # Errors
    /// - [`Error::Config`] if `ids` is empty or the worker cap is zero
    /// - [`Error::Cancelled`] if the runner's cancellation token fires
    pub async fn collect<I, T, R, F, Fut, S>(
        &self,
        ids: Vec<I>,
        fetch: F,
        select: S,
    ) -> Result<FanOutReport<I, R>>
    where
        I: Clone + Display,
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T>>,
        S: FnMut(&I, T) -> Vec<R>,
    {
        self.drive(ids, fetch, select, None::<fn(&I, &T) -> bool>)
            .await
    }

    /// Like [`collect`](Self::collect), but stop early when `should_abort` fires
    ///
    /// The predicate is only honoured when early abort is enabled in
    /// [`FanOutConfig`]. When it fires, the triggering result is dropped,
    /// every outstanding request is cancelled and the report is marked
    /// `aborted`. Since results arrive in completion order, which result
    /// triggers the abort varies between runs and the aggregate can be
    /// incomplete. With early abort disabled this behaves exactly like
    /// `collect`.
    pub async fn collect_until<I, T, R, F, Fut, S, A>(
        &self,
        ids: Vec<I>,
        fetch: F,
        select: S,
        should_abort: A,
    ) -> Result<FanOutReport<I, R>>
    where
        I: Clone + Display,
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T>>,
        S: FnMut(&I, T) -> Vec<R>,
        A: FnMut(&I, &T) -> bool,
    {
        let abort = self.early_abort.then_some(should_abort);
        self.drive(ids, fetch, select, abort).await
    }

    async fn drive<I, T, R, F, Fut, S, A>(
        &self,
        ids: Vec<I>,
        fetch: F,
        mut select: S,
        mut should_abort: Option<A>,
    ) -> Result<FanOutReport<I, R>>
    where
        I: Clone + Display,
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T>>,
        S: FnMut(&I, T) -> Vec<R>,
        A: FnMut(&I, &T) -> bool,
    {
        if ids.is_empty() {
            return Err(Error::config("identifier list is empty", "ids"));
        }
        if self.max_workers == 0 {
            return Err(Error::config(
                "max_workers must be at least 1",
                "fan_out.max_workers",
            ));
        }

        let total = ids.len();
        debug!(total, workers = self.max_workers, "Starting fan-out");

        // Early abort cancels only this run; the parent token belongs to the caller
        let run_token = self.cancel_token.child_token();

        let mut results = stream::iter(ids.into_iter().enumerate())
            .map(|(index, id)| {
                let token = run_token.clone();
                let request = fetch(id.clone());
                async move {
                    let result = tokio::select! {
                        biased;
                        _ = token.cancelled() => Err(Error::Cancelled),
                        result = request => result,
                    };
                    (index, id, result)
                }
            })
            .buffer_unordered(self.max_workers);

        let mut groups: Vec<Vec<R>> = Vec::with_capacity(total);
        groups.resize_with(total, Vec::new);
        let mut failures: Vec<(usize, FetchFailure<I>)> = Vec::new();
        let mut completed = 0;
        let mut aborted = false;

        while let Some((index, id, result)) = results.next().await {
            completed += 1;
            match result {
                Ok(value) => {
                    if let Some(abort) = should_abort.as_mut()
                        && abort(&id, &value)
                    {
                        warn!(
                            %id,
                            completed,
                            total,
                            "Early abort triggered, cancelling outstanding requests"
                        );
                        run_token.cancel();
                        aborted = true;
                        break;
                    }
                    groups[index] = select(&id, value);
                }
                Err(Error::Cancelled) if self.cancel_token.is_cancelled() => {
                    debug!(%id, "Request cancelled");
                }
                Err(error) => {
                    warn!(%id, error = %error, "Fetch failed");
                    failures.push((index, FetchFailure { id, error }));
                }
            }
        }
        drop(results);

        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        failures.sort_by_key(|(index, _)| *index);
        let records: Vec<R> = groups.into_iter().flatten().collect();
        debug!(
            completed,
            records = records.len(),
            failures = failures.len(),
            aborted,
            "Fan-out finished"
        );

        Ok(FanOutReport {
            records,
            failures: failures.into_iter().map(|(_, f)| f).collect(),
            completed,
            aborted,
        })
    }
}
