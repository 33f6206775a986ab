//! Queued query steps and their interpretation.

use std::fmt;
use std::rc::Rc;

use treeprobe_core::{ComponentRef, Event, Kind, Prop, Resolved, Transition, Value};

use super::error::{QueryError, Result};
use super::resolver::Resolver;
use super::trace::Tracer;

/// A described test over resolved components.
#[derive(Clone)]
pub struct Predicate {
    description: String,
    test: Rc<dyn Fn(&Resolved) -> bool>,
}

impl Predicate {
    pub fn new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Resolved) -> bool + 'static,
    {
        Self {
            description: description.into(),
            test: Rc::new(test),
        }
    }

    /// Matches nodes whose data prop `key` equals `expected`.
    pub fn prop_eq(key: impl Into<String>, expected: impl Into<Value>) -> Self {
        let key = key.into();
        let expected = expected.into();
        let description = format!("props.{key} == {expected}");
        Self::new(description, move |value| {
            value.prop(&key).and_then(Prop::as_value) == Some(&expected)
        })
    }

    pub fn matches(&self, value: &Resolved) -> bool {
        (self.test)(value)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.description).finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// One step of a query chain.
///
/// Operators are recorded by [`Query`](super::Query) and interpreted only
/// when a terminal read runs. Each receives the already unwrapped output of
/// the previous step.
#[derive(Clone, Debug)]
pub enum Operator {
    FindWhere(Predicate),
    FindById(String),
    FindByClass(String),
    FindFirst,
    FindNth(usize),
    FindChildren,
    UnfinishedTransition,
    FinishedTransition,
    Trigger(Event),
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::FindWhere(_) => "find_where",
            Operator::FindById(_) => "find_by_id",
            Operator::FindByClass(_) => "find_by_class",
            Operator::FindFirst => "find_first",
            Operator::FindNth(_) => "find_nth",
            Operator::FindChildren => "find_children",
            Operator::UnfinishedTransition => "unfinished_transition",
            Operator::FinishedTransition => "finished_transition",
            Operator::Trigger(_) => "trigger",
        }
    }

    /// Apply this operator to `input`.
    ///
    /// The output may still be unresolved; the pipeline unwraps it before the
    /// next step.
    pub async fn apply<T: Tracer>(
        &self,
        resolver: &Resolver<'_>,
        input: Resolved,
        tracer: &mut T,
    ) -> Result<ComponentRef> {
        match self {
            Operator::FindWhere(predicate) => {
                let target = format!("based on condition {predicate}");
                find(resolver, predicate, &target, input, tracer).await
            }
            Operator::FindById(id) => {
                let target = format!("with id \"{id}\"");
                find(resolver, &Predicate::prop_eq("id", id), &target, input, tracer).await
            }
            Operator::FindByClass(class) => {
                let target = format!("with class \"{class}\"");
                let predicate = Predicate::prop_eq("class", class);
                find(resolver, &predicate, &target, input, tracer).await
            }
            Operator::FindFirst => nth(resolver, 0, input, tracer).await,
            Operator::FindNth(n) => nth(resolver, *n, input, tracer).await,
            Operator::FindChildren => match input {
                Resolved::Array(items) => Ok(ComponentRef::Array(items)),
                Resolved::Node(node) => Ok(match resolver.node_children(&node, tracer).await? {
                    Some(children) => {
                        ComponentRef::Array(children.iter().cloned().map(Into::into).collect())
                    }
                    None => ComponentRef::Absent,
                }),
                _ => Ok(ComponentRef::Absent),
            },
            Operator::UnfinishedTransition => {
                let t = expect_transition(resolver, &input)?;
                Ok(t.from().clone())
            }
            Operator::FinishedTransition => {
                let t = expect_transition(resolver, &input)?;
                Ok(t.to().clone())
            }
            Operator::Trigger(event) => {
                let Some(handler) = input.prop(event.name()).and_then(Prop::as_handler) else {
                    return Err(QueryError::NoHandler {
                        event: event.to_string(),
                        tree: resolver.snapshot().dump(&input),
                    });
                };
                tracer.trace_handler(event);
                Ok(handler(event))
            }
        }
    }
}

async fn find<T: Tracer>(
    resolver: &Resolver<'_>,
    predicate: &Predicate,
    target: &str,
    input: Resolved,
    tracer: &mut T,
) -> Result<ComponentRef> {
    let root = ComponentRef::from(input.clone());
    match resolver.find_where_or_none(predicate, root, tracer).await? {
        Some(found) => Ok(found.into()),
        None => Err(QueryError::NotFound {
            target: target.to_owned(),
            tree: resolver.snapshot().dump(&input),
        }),
    }
}

async fn nth<T: Tracer>(
    resolver: &Resolver<'_>,
    n: usize,
    input: Resolved,
    tracer: &mut T,
) -> Result<ComponentRef> {
    match resolver.find_children_nth(n, input.clone().into(), tracer).await? {
        Some(item) => Ok(item),
        None => Err(QueryError::WrongShape {
            action: "find a component",
            expected: Kind::Array,
            found: input.kind(),
            tree: resolver.snapshot().dump(&input),
        }),
    }
}

fn expect_transition<'r>(
    resolver: &Resolver<'_>,
    input: &'r Resolved,
) -> Result<&'r Transition> {
    input.as_transition().ok_or_else(|| QueryError::WrongShape {
        action: "handle transition",
        expected: Kind::Transition,
        found: input.kind(),
        tree: resolver.snapshot().dump(input),
    })
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::FindWhere(predicate) => write!(f, "find_where({predicate})"),
            Operator::FindById(id) => write!(f, "find_by_id({id:?})"),
            Operator::FindByClass(class) => write!(f, "find_by_class({class:?})"),
            Operator::FindNth(n) => write!(f, "find_nth({n})"),
            Operator::Trigger(event) => write!(f, "trigger({})", event.name()),
            other => write!(f, "{}()", other.name()),
        }
    }
}
