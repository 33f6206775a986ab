#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for treeprobe component trees.
//!
//! Two layers:
//! - **Reference layer**: [`ComponentRef`], a value that may still be deferred
//!   (a shared future) or a thunk (a zero-argument producer).
//! - **Resolved layer**: [`Resolved`], what remains once every deferral and
//!   thunk has been collapsed: nodes, arrays, transitions, scalars.
//!
//! Diagnostic output goes through [`Value`], a plain data value that formats
//! like JSON.

mod colors;
mod component;
mod event;
mod value;

#[cfg(test)]
mod event_tests;

pub use colors::Colors;
pub use component::{
    ComponentRef, Deferred, Handler, Kind, Node, NodeId, Prop, Props, Resolved, Scalar, Thunk,
    Transition, element, fragment, transition, void_element,
};
pub use event::{Event, click, event, keydown, keypress, keyup};
pub use value::{Value, format_number};
