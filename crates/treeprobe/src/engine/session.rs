//! Sessions: configuration plus the child cache shared by their queries.

use std::fmt;
use std::rc::Rc;

use treeprobe_core::{Colors, ComponentRef};

use super::cache::ChildCache;
use super::query::Query;
use super::resolver::Resolver;
use super::snapshot::Snapshot;

/// Runtime limits for resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum deferral/thunk steps per unwrap (default: unbounded).
    pub(crate) unwrap_fuel: Option<u32>,
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of indirection steps a single unwrap may take.
    pub fn unwrap_fuel(mut self, fuel: u32) -> Self {
        self.unwrap_fuel = Some(fuel);
        self
    }

    pub fn get_unwrap_fuel(&self) -> Option<u32> {
        self.unwrap_fuel
    }
}

struct SessionState {
    cache: ChildCache,
    limits: FuelLimits,
    colors: Colors,
}

/// Shared context for query handles.
///
/// Cloning is cheap and yields a handle to the same state. Every query
/// created from a session (or derived from such a query) resolves through
/// the same [`ChildCache`].
#[derive(Clone)]
pub struct Session {
    state: Rc<SessionState>,
}

thread_local! {
    static THREAD_DEFAULT: Session = Session::new();
}

impl Session {
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// The default session of the current thread.
    ///
    /// Backs the free [`testing`](crate::testing) entry point, so separate
    /// handles over the same nodes observe children resolved earlier.
    pub fn thread_default() -> Self {
        THREAD_DEFAULT.with(Session::clone)
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Wrap a root component in a query handle bound to this session.
    pub fn testing(&self, root: impl Into<ComponentRef>) -> Query {
        Query::new(self.clone(), root.into())
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.state.cache, self.state.limits, self.state.colors)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.state.cache, self.state.colors)
    }

    pub fn cache(&self) -> &ChildCache {
        &self.state.cache
    }

    pub fn limits(&self) -> FuelLimits {
        self.state.limits
    }

    pub fn colors(&self) -> Colors {
        self.state.colors
    }

    /// True when both handles point at the same session state.
    pub fn same_session(&self, other: &Session) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cache", &self.state.cache)
            .field("limits", &self.state.limits)
            .finish()
    }
}

/// Builder for [`Session`] instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionBuilder {
    limits: FuelLimits,
    colors: Colors,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the unwrap fuel limit.
    pub fn unwrap_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.unwrap_fuel(fuel);
        self
    }

    /// Set the palette used for tree dumps in error messages.
    pub fn colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    pub fn build(self) -> Session {
        Session {
            state: Rc::new(SessionState {
                cache: ChildCache::new(),
                limits: self.limits,
                colors: self.colors,
            }),
        }
    }
}
