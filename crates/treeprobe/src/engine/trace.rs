//! Instrumentation hooks for query execution.
//!
//! Execution code is generic over [`Tracer`] and threads it by `&mut`
//! reference. With [`NoopTracer`] every hook is an empty inline function and
//! compiles away; [`PrintTracer`] collects human-readable lines for tests and
//! debugging; [`LogTracer`] forwards hooks to `tracing`.

use treeprobe_core::{Colors, Event, Node, Prop, Resolved, Scalar, format_number};

use super::error::QueryError;
use super::operator::Operator;

/// One indirection step taken while unwrapping a reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnwrapStep {
    /// A deferred value was awaited.
    Await,
    /// A thunk was invoked.
    Invoke,
}

impl UnwrapStep {
    pub fn name(self) -> &'static str {
        match self {
            UnwrapStep::Await => "await",
            UnwrapStep::Invoke => "invoke thunk",
        }
    }
}

/// Verbosity level for [`PrintTracer`] output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Operators, their results, handler calls and failures.
    #[default]
    Default,
    /// Adds search matches and children resolution.
    Verbose,
    /// Adds every search visit and every unwrap step.
    VeryVerbose,
}

/// Tracer trait for query execution instrumentation.
///
/// Hooks receive the values the engine already has at hand; formatting is
/// left to the implementation.
pub trait Tracer {
    /// Called for every deferral awaited or thunk invoked.
    fn trace_unwrap(&mut self, step: UnwrapStep);

    /// Called with the root once unwrapped, then after each operator.
    fn trace_resolved(&mut self, value: &Resolved);

    /// Called before applying the operator at `index` in the chain.
    fn trace_operator(&mut self, index: usize, operator: &Operator);

    /// Called when search tests a component against its predicate.
    fn trace_visit(&mut self, value: &Resolved);

    /// Called when search finds its match.
    fn trace_match(&mut self, value: &Resolved);

    /// Called after a node's children were unwrapped and cached.
    fn trace_children_resolved(&mut self, node: &Node, count: usize);

    /// Called when a node's children were served from the cache.
    fn trace_children_cached(&mut self, node: &Node, count: usize);

    /// Called right before an event handler runs.
    fn trace_handler(&mut self, event: &Event);

    /// Called when an operator fails and the chain aborts.
    fn trace_failure(&mut self, error: &QueryError);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_unwrap(&mut self, _step: UnwrapStep) {}

    #[inline(always)]
    fn trace_resolved(&mut self, _value: &Resolved) {}

    #[inline(always)]
    fn trace_operator(&mut self, _index: usize, _operator: &Operator) {}

    #[inline(always)]
    fn trace_visit(&mut self, _value: &Resolved) {}

    #[inline(always)]
    fn trace_match(&mut self, _value: &Resolved) {}

    #[inline(always)]
    fn trace_children_resolved(&mut self, _node: &Node, _count: usize) {}

    #[inline(always)]
    fn trace_children_cached(&mut self, _node: &Node, _count: usize) {}

    #[inline(always)]
    fn trace_handler(&mut self, _event: &Event) {}

    #[inline(always)]
    fn trace_failure(&mut self, _error: &QueryError) {}
}

/// Tracer that collects an execution trace as text lines.
pub struct PrintTracer {
    /// Verbosity level for output filtering.
    verbosity: Verbosity,
    /// Collected trace lines.
    lines: Vec<String>,
    colors: Colors,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with newlines.
    pub fn dump(&self) -> String {
        self.lines.join("\n")
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn shows(&self, level: Verbosity) -> bool {
        match level {
            Verbosity::Default => true,
            Verbosity::Verbose => self.verbosity != Verbosity::Default,
            Verbosity::VeryVerbose => self.verbosity == Verbosity::VeryVerbose,
        }
    }

    fn add_subline(&mut self, content: &str) {
        self.lines.push(format!("  {content}"));
    }
}

impl Tracer for PrintTracer {
    fn trace_unwrap(&mut self, step: UnwrapStep) {
        if self.shows(Verbosity::VeryVerbose) {
            let content = self.colors.dimmed(step.name());
            self.add_subline(&content);
        }
    }

    fn trace_resolved(&mut self, value: &Resolved) {
        let arrow = self.colors.dimmed("=>");
        self.lines.push(format!("{arrow} {}", label(value)));
    }

    fn trace_operator(&mut self, index: usize, operator: &Operator) {
        let name = self.colors.keyed(&operator.to_string());
        self.lines.push(format!("[{index}] {name}"));
    }

    fn trace_visit(&mut self, value: &Resolved) {
        if self.shows(Verbosity::VeryVerbose) {
            self.add_subline(&format!("visit {}", label(value)));
        }
    }

    fn trace_match(&mut self, value: &Resolved) {
        if self.shows(Verbosity::Verbose) {
            self.add_subline(&format!("match {}", label(value)));
        }
    }

    fn trace_children_resolved(&mut self, node: &Node, count: usize) {
        if self.shows(Verbosity::Verbose) {
            self.add_subline(&format!("children of <{}> resolved ({count})", node.tag()));
        }
    }

    fn trace_children_cached(&mut self, node: &Node, count: usize) {
        if self.shows(Verbosity::Verbose) {
            self.add_subline(&format!("children of <{}> cached ({count})", node.tag()));
        }
    }

    fn trace_handler(&mut self, event: &Event) {
        self.add_subline(&format!("trigger {}", event.name()));
    }

    fn trace_failure(&mut self, error: &QueryError) {
        let message = error.to_string();
        let first = message.lines().next().unwrap_or_default();
        self.add_subline(&format!("error: {first}"));
    }
}

/// Tracer that emits every hook as a `tracing` event.
///
/// Frequent hooks (visits, unwrap steps) use the `TRACE` level, the rest
/// `DEBUG`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace_unwrap(&mut self, step: UnwrapStep) {
        tracing::trace!(step = step.name(), "unwrap");
    }

    fn trace_resolved(&mut self, value: &Resolved) {
        tracing::debug!(kind = %value.kind(), value = %label(value), "resolved");
    }

    fn trace_operator(&mut self, index: usize, operator: &Operator) {
        tracing::debug!(index, operator = %operator, "apply operator");
    }

    fn trace_visit(&mut self, value: &Resolved) {
        tracing::trace!(value = %label(value), "visit");
    }

    fn trace_match(&mut self, value: &Resolved) {
        tracing::debug!(value = %label(value), "match");
    }

    fn trace_children_resolved(&mut self, node: &Node, count: usize) {
        tracing::debug!(node = %node.id(), tag = node.tag(), count, "children resolved");
    }

    fn trace_children_cached(&mut self, node: &Node, count: usize) {
        tracing::debug!(node = %node.id(), tag = node.tag(), count, "children cached");
    }

    fn trace_handler(&mut self, event: &Event) {
        tracing::debug!(event = event.name(), "invoke handler");
    }

    fn trace_failure(&mut self, error: &QueryError) {
        tracing::debug!(error = %error, "operator failed");
    }
}

/// Short one-line description of a resolved value.
pub(crate) fn label(value: &Resolved) -> String {
    match value {
        Resolved::Node(node) => {
            let mut out = format!("<{}", node.tag());
            for key in ["id", "class"] {
                if let Some(text) = node.prop(key).and_then(Prop::as_str) {
                    out.push_str(&format!(" {key}=\"{text}\""));
                }
            }
            out.push('>');
            out
        }
        Resolved::Array(items) => format!("array[{}]", items.len()),
        Resolved::Transition(_) => "transition".to_owned(),
        Resolved::Scalar(Scalar::Text(s)) => format!("\"{s}\""),
        Resolved::Scalar(Scalar::Number(n)) => format_number(*n),
        Resolved::Absent => "absent".to_owned(),
    }
}
