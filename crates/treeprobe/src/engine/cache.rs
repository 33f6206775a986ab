//! Memoized child resolutions keyed by node identity.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use treeprobe_core::{NodeId, Resolved};

/// Resolved children per node.
///
/// Filled by [`Resolver::children`](super::Resolver::children) and by
/// searches that exhaust a node's children. Consulted by search and dumps,
/// so within one cache a node's child thunks run at most once. Entries are never invalidated: node identities are not reused.
#[derive(Default)]
pub struct ChildCache {
    entries: RefCell<HashMap<NodeId, Rc<[Resolved]>>>,
}

impl ChildCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<Rc<[Resolved]>> {
        self.entries.borrow().get(&node).cloned()
    }

    pub fn insert(&self, node: NodeId, children: Rc<[Resolved]>) {
        self.entries.borrow_mut().insert(node, children);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.borrow().contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl fmt::Debug for ChildCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildCache")
            .field("nodes", &self.len())
            .finish()
    }
}
