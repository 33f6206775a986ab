//! Structural dumps of component trees for diagnostics.
//!
//! Dumps never resolve anything: unresolved parts render as markers
//! (`"<thunk>"`, `"<deferred>"`), deferrals that already completed render
//! as their value, and cached children render in their resolved form.

use treeprobe_core::{Colors, ComponentRef, Node, Prop, Resolved, Value};

use super::cache::ChildCache;

const THUNK_MARKER: &str = "<thunk>";
const DEFERRED_MARKER: &str = "<deferred>";

/// Converts components into [`Value`]s using a child cache.
#[derive(Clone, Copy)]
pub struct Snapshot<'c> {
    cache: &'c ChildCache,
    colors: Colors,
}

impl<'c> Snapshot<'c> {
    pub fn new(cache: &'c ChildCache, colors: Colors) -> Self {
        Self { cache, colors }
    }

    pub fn resolved(&self, value: &Resolved) -> Value {
        match value {
            Resolved::Node(node) => self.node(node),
            Resolved::Array(items) => self.array(items),
            Resolved::Transition(t) => Value::Object(vec![
                ("from".to_owned(), self.component(t.from())),
                ("to".to_owned(), self.component(t.to())),
            ]),
            Resolved::Scalar(s) => s.to_value(),
            Resolved::Absent => Value::Null,
        }
    }

    pub fn component(&self, component: &ComponentRef) -> Value {
        match component {
            ComponentRef::Deferred(deferred) => match deferred.peek() {
                Some(value) => self.component(value),
                None => Value::String(DEFERRED_MARKER.to_owned()),
            },
            ComponentRef::Thunk(_) => Value::String(THUNK_MARKER.to_owned()),
            ComponentRef::Node(node) => self.node(node),
            ComponentRef::Array(items) => self.array(items),
            ComponentRef::Transition(t) => Value::Object(vec![
                ("from".to_owned(), self.component(t.from())),
                ("to".to_owned(), self.component(t.to())),
            ]),
            ComponentRef::Scalar(s) => s.to_value(),
            ComponentRef::Absent => Value::Null,
        }
    }

    /// Pretty-printed dump, as embedded in error messages.
    pub fn dump(&self, value: &Resolved) -> String {
        self.resolved(value).format(true, self.colors)
    }

    /// Text rendering used when joining children: scalars verbatim, nothing
    /// for absent values, compact JSON for structures.
    pub fn text(&self, value: &Resolved) -> String {
        match value {
            Resolved::Scalar(s) => s.to_string(),
            Resolved::Absent => String::new(),
            other => self.resolved(other).format(false, Colors::OFF),
        }
    }

    fn node(&self, node: &Node) -> Value {
        let props = node
            .props()
            .iter()
            .map(|(key, prop)| (key.to_owned(), Prop::to_value(prop)))
            .collect();

        let mut fields = vec![
            ("tag".to_owned(), Value::String(node.tag().to_owned())),
            ("props".to_owned(), Value::Object(props)),
        ];

        let children = match self.cache.get(node.id()) {
            Some(cached) => Some(Value::Array(
                cached.iter().map(|c| self.resolved(c)).collect(),
            )),
            None => node.children().map(|declared| self.array(declared)),
        };
        if let Some(children) = children {
            fields.push(("children".to_owned(), children));
        }

        Value::Object(fields)
    }

    fn array(&self, items: &[ComponentRef]) -> Value {
        Value::Array(items.iter().map(|c| self.component(c)).collect())
    }
}
