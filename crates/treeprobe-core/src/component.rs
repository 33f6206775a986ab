//! Component references and the resolved tree they collapse into.

use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use indexmap::IndexMap;

use crate::{Event, Value, format_number};

/// A component that is not available yet. Shared, so every clone observes
/// the same single resolution.
pub type Deferred = Shared<LocalBoxFuture<'static, ComponentRef>>;

/// Zero-argument producer of a component, invoked on every unwrap.
pub type Thunk = Rc<dyn Fn() -> ComponentRef>;

/// Event handler stored in a prop. Its result replaces the node it was
/// triggered on.
pub type Handler = Rc<dyn Fn(&Event) -> ComponentRef>;

/// Any value flowing through the engine before full resolution.
#[derive(Clone)]
pub enum ComponentRef {
    Deferred(Deferred),
    Thunk(Thunk),
    Node(Rc<Node>),
    /// Fragment of sibling components.
    Array(Rc<[ComponentRef]>),
    Transition(Rc<Transition>),
    Scalar(Scalar),
    /// Result of a navigation that had nothing to return.
    Absent,
}

impl ComponentRef {
    pub fn thunk<F, T>(f: F) -> Self
    where
        F: Fn() -> T + 'static,
        T: Into<ComponentRef>,
    {
        ComponentRef::Thunk(Rc::new(move || -> ComponentRef { f().into() }))
    }

    pub fn deferred<F, T>(future: F) -> Self
    where
        F: Future<Output = T> + 'static,
        T: Into<ComponentRef>,
    {
        let future = async move {
            let component: ComponentRef = future.await.into();
            component
        };
        ComponentRef::Deferred(future.boxed_local().shared())
    }

    pub fn text(s: impl Into<String>) -> Self {
        ComponentRef::Scalar(Scalar::Text(s.into()))
    }

    pub fn number(n: f64) -> Self {
        ComponentRef::Scalar(Scalar::Number(n))
    }

    pub fn kind(&self) -> Kind {
        match self {
            ComponentRef::Deferred(_) => Kind::Deferred,
            ComponentRef::Thunk(_) => Kind::Thunk,
            ComponentRef::Node(_) => Kind::Node,
            ComponentRef::Array(_) => Kind::Array,
            ComponentRef::Transition(_) => Kind::Transition,
            ComponentRef::Scalar(_) => Kind::Scalar,
            ComponentRef::Absent => Kind::Absent,
        }
    }

    /// True when no deferral or thunk remains at the top level.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ComponentRef::Deferred(_) | ComponentRef::Thunk(_))
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentRef::Deferred(d) => match d.peek() {
                Some(value) => f.debug_tuple("Deferred").field(value).finish(),
                None => f.write_str("Deferred(<pending>)"),
            },
            ComponentRef::Thunk(_) => f.write_str("Thunk"),
            ComponentRef::Node(n) => fmt::Debug::fmt(n, f),
            ComponentRef::Array(items) => f.debug_list().entries(items.iter()).finish(),
            ComponentRef::Transition(t) => fmt::Debug::fmt(t, f),
            ComponentRef::Scalar(s) => fmt::Debug::fmt(s, f),
            ComponentRef::Absent => f.write_str("Absent"),
        }
    }
}

impl From<&str> for ComponentRef {
    fn from(s: &str) -> Self {
        ComponentRef::text(s)
    }
}

impl From<String> for ComponentRef {
    fn from(s: String) -> Self {
        ComponentRef::text(s)
    }
}

impl From<f64> for ComponentRef {
    fn from(n: f64) -> Self {
        ComponentRef::number(n)
    }
}

impl From<i32> for ComponentRef {
    fn from(n: i32) -> Self {
        ComponentRef::number(f64::from(n))
    }
}

impl From<Scalar> for ComponentRef {
    fn from(s: Scalar) -> Self {
        ComponentRef::Scalar(s)
    }
}

impl From<Node> for ComponentRef {
    fn from(node: Node) -> Self {
        ComponentRef::Node(Rc::new(node))
    }
}

impl From<Transition> for ComponentRef {
    fn from(t: Transition) -> Self {
        ComponentRef::Transition(Rc::new(t))
    }
}

impl From<Vec<ComponentRef>> for ComponentRef {
    fn from(items: Vec<ComponentRef>) -> Self {
        ComponentRef::Array(items.into())
    }
}

impl From<Resolved> for ComponentRef {
    fn from(resolved: Resolved) -> Self {
        match resolved {
            Resolved::Node(n) => ComponentRef::Node(n),
            Resolved::Array(items) => ComponentRef::Array(items),
            Resolved::Transition(t) => ComponentRef::Transition(t),
            Resolved::Scalar(s) => ComponentRef::Scalar(s),
            Resolved::Absent => ComponentRef::Absent,
        }
    }
}

/// A component with every top-level deferral and thunk collapsed.
///
/// Array elements and node children stay unresolved; they are collapsed
/// lazily as traversal reaches them.
#[derive(Clone)]
pub enum Resolved {
    Node(Rc<Node>),
    Array(Rc<[ComponentRef]>),
    Transition(Rc<Transition>),
    Scalar(Scalar),
    Absent,
}

impl Resolved {
    pub fn kind(&self) -> Kind {
        match self {
            Resolved::Node(_) => Kind::Node,
            Resolved::Array(_) => Kind::Array,
            Resolved::Transition(_) => Kind::Transition,
            Resolved::Scalar(_) => Kind::Scalar,
            Resolved::Absent => Kind::Absent,
        }
    }

    pub fn as_node(&self) -> Option<&Rc<Node>> {
        match self {
            Resolved::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ComponentRef]> {
        match self {
            Resolved::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_transition(&self) -> Option<&Transition> {
        match self {
            Resolved::Transition(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Resolved::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Props of a node; `None` for every other shape.
    pub fn props(&self) -> Option<&Props> {
        self.as_node().map(|n| n.props())
    }

    /// Shorthand for `props().get(key)`.
    pub fn prop(&self, key: &str) -> Option<&Prop> {
        self.props().and_then(|p| p.get(key))
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Node(n) => fmt::Debug::fmt(n, f),
            Resolved::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Resolved::Transition(t) => fmt::Debug::fmt(t, f),
            Resolved::Scalar(s) => fmt::Debug::fmt(s, f),
            Resolved::Absent => f.write_str("Absent"),
        }
    }
}

/// Shape tag of a component, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Deferred,
    Thunk,
    Node,
    Array,
    Transition,
    Scalar,
    Absent,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Deferred => "deferred",
            Kind::Thunk => "thunk",
            Kind::Node => "node",
            Kind::Array => "array",
            Kind::Transition => "transition",
            Kind::Scalar => "scalar",
            Kind::Absent => "absent",
        }
    }

    /// Name with an indefinite article, for sentences like "is not an array".
    pub fn with_article(self) -> &'static str {
        match self {
            Kind::Deferred => "a deferred value",
            Kind::Thunk => "a thunk",
            Kind::Node => "a node",
            Kind::Array => "an array",
            Kind::Transition => "a transition",
            Kind::Scalar => "a scalar",
            Kind::Absent => "nothing",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Leaf content.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
}

impl Scalar {
    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::Number(n) => Value::Number(*n),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a constructed node. Unique for the life of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A constructed component: a tag, props and optionally children.
///
/// `children: None` means the node has no children field at all, which is
/// distinct from an empty child list.
pub struct Node {
    id: NodeId,
    tag: String,
    props: Props,
    children: Option<Rc<[ComponentRef]>>,
}

impl Node {
    /// Create a node without a children field.
    pub fn new(tag: impl Into<String>, props: Props) -> Self {
        Self {
            id: NodeId::next(),
            tag: tag.into(),
            props,
            children: None,
        }
    }

    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ComponentRef>,
    {
        self.children = Some(children.into_iter().map(Into::into).collect());
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn prop(&self, key: &str) -> Option<&Prop> {
        self.props.get(key)
    }

    /// Declared (unresolved) children.
    pub fn children(&self) -> Option<&[ComponentRef]> {
        self.children.as_deref()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        s.field("id", &self.id)
            .field("tag", &self.tag)
            .field("props", &self.props);
        if let Some(children) = &self.children {
            s.field("children", children);
        }
        s.finish()
    }
}

/// Two-step staged value: `from` while unfinished, `to` once finished.
#[derive(Clone, Debug)]
pub struct Transition {
    from: ComponentRef,
    to: ComponentRef,
}

impl Transition {
    pub fn new(from: impl Into<ComponentRef>, to: impl Into<ComponentRef>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from(&self) -> &ComponentRef {
        &self.from
    }

    pub fn to(&self) -> &ComponentRef {
        &self.to
    }
}

/// Insertion-ordered prop mapping.
#[derive(Clone, Default)]
pub struct Props(IndexMap<String, Prop>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Prop>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style handler registration under an event name such as
    /// `onclick`.
    pub fn on<F, T>(self, event_name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Event) -> T + 'static,
        T: Into<ComponentRef>,
    {
        self.with(event_name, Prop::handler(handler))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Prop>) -> Option<Prop> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prop)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Props
where
    K: Into<String>,
    V: Into<Prop>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<String>,
    V: Into<Prop>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A prop value: plain data or an event handler.
#[derive(Clone)]
pub enum Prop {
    Value(Value),
    Handler(Handler),
}

impl Prop {
    pub fn handler<F, T>(f: F) -> Self
    where
        F: Fn(&Event) -> T + 'static,
        T: Into<ComponentRef>,
    {
        Prop::Handler(Rc::new(move |event: &Event| -> ComponentRef {
            f(event).into()
        }))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Prop::Value(v) => Some(v),
            Prop::Handler(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Prop::Handler(h) => Some(h),
            Prop::Value(_) => None,
        }
    }

    /// Data view of the prop; handlers render as the `"<handler>"` marker.
    pub fn to_value(&self) -> Value {
        match self {
            Prop::Value(v) => v.clone(),
            Prop::Handler(_) => Value::String("<handler>".to_owned()),
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(v) => fmt::Debug::fmt(v, f),
            Prop::Handler(_) => f.write_str("Handler"),
        }
    }
}

impl PartialEq for Prop {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Prop::Value(a), Prop::Value(b)) => a == b,
            (Prop::Handler(a), Prop::Handler(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Value> for Prop {
    fn from(v: Value) -> Self {
        Prop::Value(v)
    }
}

impl From<&str> for Prop {
    fn from(s: &str) -> Self {
        Prop::Value(s.into())
    }
}

impl From<String> for Prop {
    fn from(s: String) -> Self {
        Prop::Value(s.into())
    }
}

impl From<&String> for Prop {
    fn from(s: &String) -> Self {
        Prop::Value(s.into())
    }
}

impl From<f64> for Prop {
    fn from(n: f64) -> Self {
        Prop::Value(n.into())
    }
}

impl From<i32> for Prop {
    fn from(n: i32) -> Self {
        Prop::Value(n.into())
    }
}

impl From<bool> for Prop {
    fn from(b: bool) -> Self {
        Prop::Value(b.into())
    }
}

/// Construct a node with a children field.
pub fn element<I>(tag: &str, props: Props, children: I) -> ComponentRef
where
    I: IntoIterator,
    I::Item: Into<ComponentRef>,
{
    Node::new(tag, props).with_children(children).into()
}

/// Construct a node without a children field.
pub fn void_element(tag: &str, props: Props) -> ComponentRef {
    Node::new(tag, props).into()
}

/// Construct a fragment of siblings.
pub fn fragment<I>(items: I) -> ComponentRef
where
    I: IntoIterator,
    I::Item: Into<ComponentRef>,
{
    ComponentRef::Array(items.into_iter().map(Into::into).collect())
}

pub fn transition(from: impl Into<ComponentRef>, to: impl Into<ComponentRef>) -> ComponentRef {
    Transition::new(from, to).into()
}
