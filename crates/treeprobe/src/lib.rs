//! treeprobe: query and assertion engine for lazily resolved component trees.
//!
//! A component tree may contain deferred values (futures) and thunks
//! (zero-argument producers) anywhere. Queries are recorded first and
//! replayed only when a terminal read runs.
//!
//! # Example
//!
//! ```
//! use futures::executor::block_on;
//! use treeprobe::{Props, element, testing};
//!
//! let root = element(
//!     "div",
//!     Props::new(),
//!     [element("p", Props::from([("id", "greeting")]), ["hello"])],
//! );
//!
//! let text = block_on(testing(root).find_by_id("greeting").text_content())
//!     .expect("query failed");
//! assert_eq!(text.as_str(), Some("hello"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

pub use engine::{
    ChildCache, FuelLimits, LogTracer, NoopTracer, Operator, Predicate, PrintTracer, Query,
    QueryError, Resolver, Result, Session, SessionBuilder, Snapshot, Tracer, UnwrapStep,
    Verbosity,
};
pub use treeprobe_core::{
    Colors, ComponentRef, Event, Kind, Node, NodeId, Prop, Props, Resolved, Scalar, Transition,
    Value, click, element, event, fragment, keydown, keypress, keyup, transition, void_element,
};

/// Wrap a root component in a query handle bound to the thread's default
/// [`Session`].
///
/// Every handle created this way on one thread shares resolved children.
/// Use a session from [`Session::builder`] for an isolated cache.
pub fn testing(root: impl Into<ComponentRef>) -> Query {
    Session::thread_default().testing(root)
}
