//! Request feed state.
//!
//! The feed reconciles the one-shot snapshot with the live stream. Every
//! operation is a transition that consumes the current state and returns the
//! next one, so the logic can be exercised without any rendering runtime.

use crate::filter::MethodFilter;
use crate::format::pluralize;
use crate::id::RequestId;
use crate::request::CapturedRequest;

/// Loading phase of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedPhase {
    /// Waiting for the snapshot. Live items are buffered.
    #[default]
    Loading,
    /// Snapshot ingested.
    Ready,
    /// The snapshot could not be fetched. Live items are still kept.
    Failed {
        /// Why the load failed.
        reason: String,
    },
}

/// The in-memory list of captured requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    requests: Vec<CapturedRequest>,
    pending: Vec<CapturedRequest>,
    phase: FeedPhase,
}

impl FeedState {
    /// Creates an empty feed waiting for its snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list with the snapshot.
    ///
    /// Items that arrived on the live stream while loading are then layered
    /// on top, so none is lost whichever source resolves first.
    #[must_use]
    pub fn ingest(self, snapshot: Vec<CapturedRequest>) -> Self {
        let mut next = Self {
            requests: Vec::with_capacity(snapshot.len() + self.pending.len()),
            pending: Vec::new(),
            phase: FeedPhase::Ready,
        };
        for request in snapshot {
            if !next.contains(&request.id) {
                next.requests.push(request);
            }
        }
        self.pending
            .into_iter()
            .fold(next, |state, request| state.append(request))
    }

    /// Prepends one live item. Known ids are ignored.
    #[must_use]
    pub fn append(mut self, request: CapturedRequest) -> Self {
        if self.contains(&request.id) {
            return self;
        }
        if self.phase == FeedPhase::Loading {
            self.pending.push(request);
        } else {
            self.requests.insert(0, request);
        }
        self
    }

    /// Records that the snapshot could not be loaded.
    ///
    /// Live items already buffered, and any arriving later, are still kept
    /// and shown below the failure.
    #[must_use]
    pub fn fail_load(self, reason: impl Into<String>) -> Self {
        let next = Self {
            requests: self.requests,
            pending: Vec::new(),
            phase: FeedPhase::Failed {
                reason: reason.into(),
            },
        };
        self.pending
            .into_iter()
            .fold(next, |state, request| state.append(request))
    }

    /// Empties the list, including anything still buffered.
    #[must_use]
    pub fn clear(self) -> Self {
        Self {
            requests: Vec::new(),
            pending: Vec::new(),
            phase: self.phase,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &FeedPhase {
        &self.phase
    }

    /// Returns true if the request is already in the feed or buffered.
    #[must_use]
    pub fn contains(&self, id: &RequestId) -> bool {
        self.requests
            .iter()
            .chain(&self.pending)
            .any(|request| &request.id == id)
    }

    /// The requests in list order (newest arrival first), unsorted.
    #[must_use]
    pub fn requests(&self) -> &[CapturedRequest] {
        &self.requests
    }

    /// Number of requests, ignoring any filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true if the feed holds no requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Requests newest first.
    #[must_use]
    pub fn sorted(&self) -> Vec<&CapturedRequest> {
        sort_requests(&self.requests)
    }

    /// Sorted requests passing `filter`.
    #[must_use]
    pub fn visible(&self, filter: &MethodFilter) -> Vec<&CapturedRequest> {
        let sorted = self.sorted();
        filter_requests(sorted, filter)
    }

    /// Heading such as "2 Requests" for the requests passing `filter`.
    #[must_use]
    pub fn count_label(&self, filter: &MethodFilter) -> String {
        count_label(self.visible(filter).len())
    }
}

/// Sorts descending by `created_at`; ties keep their relative order.
#[must_use]
pub fn sort_requests(requests: &[CapturedRequest]) -> Vec<&CapturedRequest> {
    let mut sorted: Vec<&CapturedRequest> = requests.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Keeps the requests matching `filter`, preserving order.
#[must_use]
pub fn filter_requests<'a, I>(requests: I, filter: &MethodFilter) -> Vec<&'a CapturedRequest>
where
    I: IntoIterator<Item = &'a CapturedRequest>,
{
    requests
        .into_iter()
        .filter(|request| filter.matches(request.method()))
        .collect()
}

/// "1 Request" / "N Requests".
#[must_use]
pub fn count_label(count: usize) -> String {
    pluralize(count, "Request")
}
