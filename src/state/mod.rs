//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet`: URLs already scheduled in this run, shared by extraction workers

mod visited;

pub use visited::VisitedSet;
