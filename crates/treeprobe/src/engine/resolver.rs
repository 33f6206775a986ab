//! Collapsing component references and searching the resulting tree.

use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};

use treeprobe_core::{Colors, ComponentRef, Node, Resolved};

use super::cache::ChildCache;
use super::error::{QueryError, Result};
use super::operator::Predicate;
use super::session::FuelLimits;
use super::snapshot::Snapshot;
use super::trace::{NoopTracer, Tracer, UnwrapStep};

/// Resolution primitives bound to one child cache.
///
/// Obtained from [`Session::resolver`](super::Session::resolver).
pub struct Resolver<'s> {
    cache: &'s ChildCache,
    limits: FuelLimits,
    colors: Colors,
}

impl<'s> Resolver<'s> {
    pub fn new(cache: &'s ChildCache, limits: FuelLimits, colors: Colors) -> Self {
        Self {
            cache,
            limits,
            colors,
        }
    }

    pub fn cache(&self) -> &'s ChildCache {
        self.cache
    }

    pub fn snapshot(&self) -> Snapshot<'s> {
        Snapshot::new(self.cache, self.colors)
    }

    /// Collapse `component` until neither a deferral nor a thunk remains.
    ///
    /// Deferrals are awaited and thunks invoked in a loop, so arbitrarily long
    /// indirection chains do not grow the stack. Fails only when an unwrap
    /// fuel limit is configured and exceeded.
    pub async fn unwrap<T: Tracer>(
        &self,
        component: ComponentRef,
        tracer: &mut T,
    ) -> Result<Resolved> {
        let mut current = component;
        let mut steps = 0;
        loop {
            current = match current {
                ComponentRef::Deferred(deferred) => {
                    self.consume_fuel(&mut steps)?;
                    tracer.trace_unwrap(UnwrapStep::Await);
                    deferred.await
                }
                ComponentRef::Thunk(thunk) => {
                    self.consume_fuel(&mut steps)?;
                    tracer.trace_unwrap(UnwrapStep::Invoke);
                    thunk()
                }
                ComponentRef::Node(node) => return Ok(Resolved::Node(node)),
                ComponentRef::Array(items) => return Ok(Resolved::Array(items)),
                ComponentRef::Transition(t) => return Ok(Resolved::Transition(t)),
                ComponentRef::Scalar(s) => return Ok(Resolved::Scalar(s)),
                ComponentRef::Absent => return Ok(Resolved::Absent),
            };
        }
    }

    fn consume_fuel(&self, steps: &mut u32) -> Result<()> {
        if let Some(limit) = self.limits.unwrap_fuel {
            if *steps >= limit {
                return Err(QueryError::FuelExhausted { limit });
            }
        }
        *steps += 1;
        Ok(())
    }

    /// Resolved children of `root`, or `None` when it is not a node with a
    /// children field.
    pub async fn children<T: Tracer>(
        &self,
        root: ComponentRef,
        tracer: &mut T,
    ) -> Result<Option<Rc<[Resolved]>>> {
        match self.unwrap(root, tracer).await? {
            Resolved::Node(node) => self.node_children(&node, tracer).await,
            _ => Ok(None),
        }
    }

    /// Resolved children of an already resolved node.
    ///
    /// All children are unwrapped concurrently; the result keeps declared
    /// order regardless of completion order and is recorded in the cache.
    /// A cached node returns its recorded children without unwrapping again.
    pub async fn node_children<T: Tracer>(
        &self,
        node: &Node,
        tracer: &mut T,
    ) -> Result<Option<Rc<[Resolved]>>> {
        let Some(declared) = node.children() else {
            return Ok(None);
        };

        if let Some(cached) = self.cache.get(node.id()) {
            tracer.trace_children_cached(node, cached.len());
            return Ok(Some(cached));
        }

        // Concurrent unwraps cannot share the caller's tracer.
        let pending = declared.iter().cloned().map(move |child| async move {
            let mut quiet = NoopTracer;
            self.unwrap(child, &mut quiet).await
        });
        let resolved: Rc<[Resolved]> = future::try_join_all(pending).await?.into();

        self.cache.insert(node.id(), resolved.clone());
        tracer.trace_children_resolved(node, resolved.len());
        Ok(Some(resolved))
    }

    /// First component in pre-order, document order, satisfying `predicate`.
    ///
    /// Siblings are searched strictly one after another: a later sibling is
    /// not unwrapped (its thunk not invoked) until every earlier subtree has
    /// been searched. Only node children are descended into. A node whose
    /// children were all searched without a match has them recorded in the
    /// cache, so a failed search leaves the visited tree dumpable.
    pub async fn find_where_or_none<T: Tracer>(
        &self,
        predicate: &Predicate,
        root: ComponentRef,
        tracer: &mut T,
    ) -> Result<Option<Resolved>> {
        let root = self.unwrap(root, tracer).await?;
        self.search(predicate, root, tracer).await
    }

    fn search<'a, T: Tracer>(
        &'a self,
        predicate: &'a Predicate,
        root: Resolved,
        tracer: &'a mut T,
    ) -> LocalBoxFuture<'a, Result<Option<Resolved>>> {
        async move {
            tracer.trace_visit(&root);
            if predicate.matches(&root) {
                tracer.trace_match(&root);
                return Ok(Some(root));
            }

            let Resolved::Node(node) = &root else {
                return Ok(None);
            };

            if let Some(cached) = self.cache.get(node.id()) {
                for child in cached.iter().cloned() {
                    if let Some(found) = self.search(predicate, child, tracer).await? {
                        return Ok(Some(found));
                    }
                }
                return Ok(None);
            }

            let Some(declared) = node.children() else {
                return Ok(None);
            };
            let mut visited = Vec::with_capacity(declared.len());
            for child in declared.iter().cloned() {
                let child = self.unwrap(child, tracer).await?;
                visited.push(child.clone());
                if let Some(found) = self.search(predicate, child, tracer).await? {
                    return Ok(Some(found));
                }
            }

            let visited: Rc<[Resolved]> = visited.into();
            tracer.trace_children_resolved(node, visited.len());
            self.cache.insert(node.id(), visited);
            Ok(None)
        }
        .boxed_local()
    }

    /// Element `n` of an array root.
    ///
    /// Returns `None` when `root` is not an array at all, and fails with
    /// [`QueryError::OutOfRange`] when it is an array that is too short.
    pub async fn find_children_nth<T: Tracer>(
        &self,
        n: usize,
        root: ComponentRef,
        tracer: &mut T,
    ) -> Result<Option<ComponentRef>> {
        let root = self.unwrap(root, tracer).await?;
        let Resolved::Array(items) = &root else {
            return Ok(None);
        };

        match items.get(n) {
            Some(item) => Ok(Some(item.clone())),
            None => Err(QueryError::OutOfRange {
                index: n,
                len: items.len(),
                tree: self.snapshot().dump(&root),
            }),
        }
    }
}
