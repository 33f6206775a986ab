//! Errors that can occur during query execution.
//!
//! Every variant embeds a pretty-printed dump of the value under inspection,
//! so a failing assertion can be debugged without re-running it.

use treeprobe_core::Kind;

#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// A search exhausted the subtree without a match.
    #[error("could not find component {target} in component tree:\n{tree}")]
    NotFound { target: String, tree: String },

    /// An operator received a shape it cannot work with.
    #[error(
        "could not {action} because the component tree is not {wanted}, is {actual}:\n{tree}",
        wanted = .expected.with_article(),
        actual = .found.with_article()
    )]
    WrongShape {
        action: &'static str,
        expected: Kind,
        found: Kind,
        tree: String,
    },

    #[error(
        "could not find a component at index {index} because the array has {len} elements:\n{tree}"
    )]
    OutOfRange {
        index: usize,
        len: usize,
        tree: String,
    },

    /// The node has no handler prop under the event's name.
    #[error("could not trigger the event {event} because there is no event handler set up:\n{tree}")]
    NoHandler { event: String, tree: String },

    /// Unwrap fuel exhausted (too many nested deferrals or thunks).
    #[error("unwrap limit of {limit} steps exceeded")]
    FuelExhausted { limit: u32 },
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
