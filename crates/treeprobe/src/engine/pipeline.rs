//! Replaying a queued operator chain and the terminal reads built on it.

use futures::future;

use treeprobe_core::{ComponentRef, Prop, Resolved, Value};

use super::error::Result;
use super::operator::Operator;
use super::resolver::Resolver;
use super::trace::{NoopTracer, Tracer};

/// Unwrap `root`, then apply `operators` in order, unwrapping each output.
///
/// The first failure aborts the chain and is reported to `tracer`, whether
/// it came from an operator or from unwrapping.
pub(crate) async fn resolve_component<T: Tracer>(
    resolver: &Resolver<'_>,
    root: ComponentRef,
    operators: &[Operator],
    tracer: &mut T,
) -> Result<Resolved> {
    let result = replay(resolver, root, operators, tracer).await;
    if let Err(error) = &result {
        tracer.trace_failure(error);
    }
    result
}

async fn replay<T: Tracer>(
    resolver: &Resolver<'_>,
    root: ComponentRef,
    operators: &[Operator],
    tracer: &mut T,
) -> Result<Resolved> {
    let mut current = resolver.unwrap(root, tracer).await?;
    tracer.trace_resolved(&current);

    for (index, operator) in operators.iter().enumerate() {
        tracer.trace_operator(index, operator);
        let output = operator.apply(resolver, current, tracer).await?;
        current = resolver.unwrap(output, tracer).await?;
        tracer.trace_resolved(&current);
    }

    Ok(current)
}

pub(crate) fn read_attribute(value: &Resolved, name: &str) -> Option<Prop> {
    value.prop(name).cloned()
}

/// Text of a resolved value.
///
/// A truthy `value` prop wins; then the node's children rendered and joined
/// with single spaces; then the value itself as data.
pub(crate) async fn read_text_content<T: Tracer>(
    resolver: &Resolver<'_>,
    value: &Resolved,
    tracer: &mut T,
) -> Result<Value> {
    if let Some(Prop::Value(v)) = value.prop("value")
        && v.is_truthy()
    {
        return Ok(v.clone());
    }

    if let Resolved::Node(node) = value
        && let Some(children) = resolver.node_children(node, tracer).await?
    {
        let snapshot = resolver.snapshot();
        let joined = children
            .iter()
            .map(|child| snapshot.text(child))
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            return Ok(Value::String(joined));
        }
    }

    content_value(resolver, value).await
}

async fn content_value(resolver: &Resolver<'_>, value: &Resolved) -> Result<Value> {
    let snapshot = resolver.snapshot();
    match value {
        Resolved::Scalar(s) => Ok(s.to_value()),
        Resolved::Absent => Ok(Value::Null),
        Resolved::Array(items) => {
            let pending = items.iter().cloned().map(|item| async move {
                let mut quiet = NoopTracer;
                resolver.unwrap(item, &mut quiet).await
            });
            let resolved = future::try_join_all(pending).await?;
            Ok(Value::Array(
                resolved.iter().map(|r| snapshot.resolved(r)).collect(),
            ))
        }
        other => Ok(snapshot.resolved(other)),
    }
}
