//! Query execution engine.
//!
//! A [`Query`] records [`Operator`]s against an unresolved root. Terminal
//! reads drive a [`Resolver`] over the tree and replay the operators in
//! order, each one receiving an already unwrapped value.

mod cache;
mod error;
mod operator;
mod pipeline;
mod query;
mod resolver;
mod session;
mod snapshot;
mod trace;

#[cfg(test)]
mod operator_tests;
#[cfg(test)]
mod snapshot_tests;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod trace_tests;

pub use cache::ChildCache;
pub use error::{QueryError, Result};
pub use operator::{Operator, Predicate};
pub use query::Query;
pub use resolver::Resolver;
pub use session::{FuelLimits, Session, SessionBuilder};
pub use snapshot::Snapshot;
pub use trace::{LogTracer, NoopTracer, PrintTracer, Tracer, UnwrapStep, Verbosity};
