use std::sync::Arc;
use std::time::Duration;

use super::Editor;

use async_trait::async_trait;
use futures::future::join_all;
use uuid::Uuid;

use crate::{
    api::BackfillAPI,
    entities::{Coordinates, Stop},
    error::Error,
    external::LocationResolver,
};

/// A reverse lookup for a stop whose location text is raw coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct BackfillRequest {
    pub stop_key: Uuid,
    pub coordinates: Coordinates,
    pub raw_text: String,
}

impl BackfillRequest {
    /// `None` unless the stop still shows raw coordinates as its location.
    pub fn for_stop(stop: &Stop) -> Option<Self> {
        if !stop.needs_backfill() {
            return None;
        }

        Some(Self {
            stop_key: stop.key,
            coordinates: stop.coordinates?,
            raw_text: stop.location_text.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackfillResult {
    pub request: BackfillRequest,
    pub address: Result<String, Error>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BackfillOutcome {
    Applied { stop_key: Uuid },
    Discarded(DiscardReason),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiscardReason {
    /// The stop was removed, or its day truncated, before the result arrived.
    StopRemoved,
    /// The stop's location changed since the lookup was issued.
    Superseded,
    /// The lookup failed or timed out; the raw text stays.
    ResolverFailed(Error),
}

/// A batch of lookups that owns everything it needs, so the editor stays
/// free for edits while it runs.
pub struct BackfillTask {
    resolver: Arc<dyn LocationResolver>,
    timeout: Duration,
    requests: Vec<BackfillRequest>,
}

impl BackfillTask {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Issues every lookup concurrently.
    #[tracing::instrument(name = "BackfillTask::run", skip(self), fields(requests = self.requests.len()))]
    pub async fn run(self) -> Vec<BackfillResult> {
        let resolver = self.resolver;
        let timeout = self.timeout;

        let lookups = self.requests.into_iter().map(|request| {
            let resolver = resolver.clone();

            async move {
                let address = tokio::time::timeout(timeout, resolver.resolve_reverse(request.coordinates))
                    .await
                    .map_err(Error::from)
                    .and_then(|result| result);

                BackfillResult { request, address }
            }
        });

        join_all(lookups).await
    }
}

#[async_trait]
impl BackfillAPI for Editor {
    fn pending_backfills(&self) -> Vec<BackfillRequest> {
        self.draft
            .days
            .iter()
            .flat_map(|day| day.stops.iter())
            .filter_map(BackfillRequest::for_stop)
            .collect()
    }

    fn backfill_task(&self, requests: Vec<BackfillRequest>) -> BackfillTask {
        BackfillTask {
            resolver: self.collaborators.resolver.clone(),
            timeout: self.collaborators.resolver_timeout,
            requests,
        }
    }

    /// Applies a lookup result only if its stop still exists and still
    /// holds the raw text and coordinates the lookup was issued for.
    #[tracing::instrument(skip(self))]
    fn apply_backfill(&mut self, result: BackfillResult) -> BackfillOutcome {
        let BackfillResult { request, address } = result;

        let stop = match self.draft.find_stop_mut(&request.stop_key) {
            Some(stop) => stop,
            None => {
                tracing::debug!("discarding back-fill for removed stop {}", request.stop_key);
                return BackfillOutcome::Discarded(DiscardReason::StopRemoved);
            }
        };

        if stop.location_resolved
            || stop.location_text != request.raw_text
            || stop.coordinates != Some(request.coordinates)
        {
            tracing::debug!("discarding superseded back-fill for stop {}", request.stop_key);
            return BackfillOutcome::Discarded(DiscardReason::Superseded);
        }

        match address {
            Ok(address) => {
                stop.location_text = address;
                stop.location_resolved = true;
                BackfillOutcome::Applied {
                    stop_key: request.stop_key,
                }
            }
            Err(err) => {
                tracing::warn!(
                    "reverse lookup for {} failed, keeping raw text: {}",
                    request.coordinates,
                    err
                );
                BackfillOutcome::Discarded(DiscardReason::ResolverFailed(err))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn backfill_locations(&mut self) -> Vec<BackfillOutcome> {
        let requests = self.pending_backfills();
        if requests.is_empty() {
            return Vec::new();
        }

        let results = self.backfill_task(requests).run().await;

        results
            .into_iter()
            .map(|result| self.apply_backfill(result))
            .collect()
    }
}
