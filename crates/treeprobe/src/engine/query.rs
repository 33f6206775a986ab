//! Immutable query handles.

use treeprobe_core::{ComponentRef, Event, Prop, Resolved, Value};

use super::error::Result;
use super::operator::{Operator, Predicate};
use super::pipeline;
use super::session::Session;
use super::trace::{NoopTracer, Tracer};

/// A root component plus a queued chain of operators.
///
/// Chain methods return a new handle and never touch the receiver, so one
/// handle can be the base of several independent queries. Nothing resolves
/// until a terminal read (`resolve`, `attribute`, `text_content`) runs.
#[derive(Clone, Debug)]
pub struct Query {
    session: Session,
    root: ComponentRef,
    operators: Vec<Operator>,
}

impl Query {
    pub(crate) fn new(session: Session, root: ComponentRef) -> Self {
        Self {
            session,
            root,
            operators: Vec::new(),
        }
    }

    pub fn root(&self) -> &ComponentRef {
        &self.root
    }

    /// Operators queued so far, in application order.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A new handle with `operator` appended.
    pub fn then(&self, operator: Operator) -> Query {
        let mut next = self.clone();
        next.operators.push(operator);
        next
    }

    pub fn find_where(&self, predicate: Predicate) -> Query {
        self.then(Operator::FindWhere(predicate))
    }

    pub fn find_by_id(&self, id: impl Into<String>) -> Query {
        self.then(Operator::FindById(id.into()))
    }

    pub fn find_by_class(&self, class: impl Into<String>) -> Query {
        self.then(Operator::FindByClass(class.into()))
    }

    pub fn find_first(&self) -> Query {
        self.then(Operator::FindFirst)
    }

    pub fn find_nth(&self, n: usize) -> Query {
        self.then(Operator::FindNth(n))
    }

    pub fn find_children(&self) -> Query {
        self.then(Operator::FindChildren)
    }

    pub fn unfinished_transition(&self) -> Query {
        self.then(Operator::UnfinishedTransition)
    }

    pub fn finished_transition(&self) -> Query {
        self.then(Operator::FinishedTransition)
    }

    pub fn trigger(&self, event: Event) -> Query {
        self.then(Operator::Trigger(event))
    }

    /// Run the chain and return the final resolved value.
    pub async fn resolve(&self) -> Result<Resolved> {
        self.resolve_with(&mut NoopTracer).await
    }

    pub async fn resolve_with<T: Tracer>(&self, tracer: &mut T) -> Result<Resolved> {
        let resolver = self.session.resolver();
        pipeline::resolve_component(&resolver, self.root.clone(), &self.operators, tracer).await
    }

    /// Run the chain and read prop `name` of the resulting node.
    ///
    /// Yields `None` for a missing key or a result that is not a node.
    pub async fn attribute(&self, name: &str) -> Result<Option<Prop>> {
        self.attribute_with(name, &mut NoopTracer).await
    }

    pub async fn attribute_with<T: Tracer>(
        &self,
        name: &str,
        tracer: &mut T,
    ) -> Result<Option<Prop>> {
        let value = self.resolve_with(tracer).await?;
        Ok(pipeline::read_attribute(&value, name))
    }

    /// Run the chain and read the text of the result.
    pub async fn text_content(&self) -> Result<Value> {
        self.text_content_with(&mut NoopTracer).await
    }

    pub async fn text_content_with<T: Tracer>(&self, tracer: &mut T) -> Result<Value> {
        let value = self.resolve_with(tracer).await?;
        let resolver = self.session.resolver();
        pipeline::read_text_content(&resolver, &value, tracer).await
    }
}
