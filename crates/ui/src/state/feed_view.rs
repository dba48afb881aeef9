//! View state for the request feed.

use std::collections::HashMap;

use rhole_domain::{CapturedRequest, FeedState, MethodFilter, RequestId};

/// Filter selection and detail visibility of the feed.
///
/// Each card starts from the global details setting and can be flipped on
/// its own. Changing the global setting resets every card to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedView {
    filter: MethodFilter,
    show_all_details: bool,
    overrides: HashMap<RequestId, bool>,
}

impl Default for FeedView {
    fn default() -> Self {
        Self {
            filter: MethodFilter::All,
            show_all_details: true,
            overrides: HashMap::new(),
        }
    }
}

impl FeedView {
    /// Creates a view showing everything with details expanded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given global details setting.
    #[must_use]
    pub fn with_details(mut self, show: bool) -> Self {
        self.show_all_details = show;
        self
    }

    /// Starts with the given filter.
    #[must_use]
    pub fn with_filter(mut self, filter: MethodFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The selected filter.
    #[must_use]
    pub const fn filter(&self) -> &MethodFilter {
        &self.filter
    }

    /// Selects a filter. Detail visibility is left alone.
    pub fn select_filter(&mut self, filter: MethodFilter) {
        self.filter = filter;
    }

    /// The global details setting.
    #[must_use]
    pub const fn show_all_details(&self) -> bool {
        self.show_all_details
    }

    /// Flips the global setting and resets every card to it.
    pub fn toggle_all_details(&mut self) {
        self.show_all_details = !self.show_all_details;
        self.overrides.clear();
    }

    /// Flips one card and returns its new visibility.
    pub fn toggle_details(&mut self, id: &RequestId) -> bool {
        let show = !self.details_visible(id);
        if show == self.show_all_details {
            self.overrides.remove(id);
        } else {
            self.overrides.insert(id.clone(), show);
        }
        show
    }

    /// Whether a card shows its headers and params.
    #[must_use]
    pub fn details_visible(&self, id: &RequestId) -> bool {
        self.overrides
            .get(id)
            .copied()
            .unwrap_or(self.show_all_details)
    }

    /// Drops card overrides for requests no longer in the feed.
    pub fn retain(&mut self, feed: &FeedState) {
        self.overrides.retain(|id, _| feed.contains(id));
    }

    /// The requests to show, newest first, after filtering.
    #[must_use]
    pub fn visible<'a>(&self, feed: &'a FeedState) -> Vec<&'a CapturedRequest> {
        feed.visible(&self.filter)
    }

    /// Label of the details toggle button.
    #[must_use]
    pub const fn details_label(&self) -> &'static str {
        if self.show_all_details {
            "Hide Details"
        } else {
            "Show Details"
        }
    }

    /// Label of the filter button.
    #[must_use]
    pub fn filter_label(&self) -> String {
        format!("Filter: {}", self.filter.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rhole_domain::{Method, RequestFields};

    fn request(id: &str, method: Method, second: u32) -> CapturedRequest {
        CapturedRequest::new(
            id,
            RequestFields::new(method, "/"),
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, second).unwrap(),
        )
    }

    #[test]
    fn test_defaults() {
        let view = FeedView::new();
        assert_eq!(view.filter(), &MethodFilter::All);
        assert!(view.show_all_details());
        assert_eq!(view.details_label(), "Hide Details");
        assert_eq!(view.filter_label(), "Filter: ALL");
    }

    #[test]
    fn test_card_toggle_is_independent() {
        let mut view = FeedView::new();
        let a = RequestId::new("a");
        let b = RequestId::new("b");

        assert!(!view.toggle_details(&a));
        assert!(!view.details_visible(&a));
        assert!(view.details_visible(&b));

        assert!(view.toggle_details(&a));
        assert!(view.details_visible(&a));
    }

    #[test]
    fn test_global_toggle_resets_cards() {
        let mut view = FeedView::new();
        let a = RequestId::new("a");
        view.toggle_details(&a);

        view.toggle_all_details();
        assert_eq!(view.details_label(), "Show Details");
        assert!(!view.details_visible(&a));

        view.toggle_details(&a);
        assert!(view.details_visible(&a));

        view.toggle_all_details();
        assert!(view.details_visible(&a));
        assert!(view.details_visible(&RequestId::new("b")));
    }

    #[test]
    fn test_filter_selection() {
        let feed = FeedState::new().ingest(vec![
            request("get", Method::Get, 0),
            request("post", Method::Post, 1),
        ]);
        let mut view = FeedView::new();
        assert_eq!(view.visible(&feed).len(), 2);

        view.select_filter(MethodFilter::Only(Method::Post));
        assert_eq!(view.filter_label(), "Filter: POST");
        let ids: Vec<&str> = view.visible(&feed).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["post"]);
        assert!(view.show_all_details());
    }

    #[test]
    fn test_retain_drops_cleared_overrides() {
        let feed = FeedState::new().ingest(vec![request("a", Method::Get, 0)]);
        let mut view = FeedView::new();
        view.toggle_details(&RequestId::new("a"));

        view.retain(&feed);
        assert!(!view.details_visible(&RequestId::new("a")));

        view.retain(&feed.clear());
        assert!(view.details_visible(&RequestId::new("a")));
    }
}
