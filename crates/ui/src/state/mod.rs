//! UI state that lives only in the console.

mod feed_view;

pub use feed_view::FeedView;
