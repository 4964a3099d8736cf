//! Aggregation engine: the two ways records are gathered from the API.
//!
//! - [`paginator`] - walk a numbered-page endpoint until the server says stop
//! - [`fanout`] - fetch many independent identifiers with a bounded worker pool
//!
//! Neither strategy calls the other. Both only need a [`crate::transport::Transport`].

pub mod fanout;
pub mod paginator;

pub use fanout::{FanOut, FanOutReport};
pub use paginator::collect_pages;
