use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::executor::block_on;

use treeprobe_core::ComponentRef;

pub fn run<F: Future>(future: F) -> F::Output {
    block_on(future)
}

/// Shared invocation counter for thunks built by [`counted`].
#[derive(Clone, Default)]
pub struct Calls(Rc<Cell<usize>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    pub fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }
}

/// A thunk producing `component` that counts its invocations.
pub fn counted(calls: &Calls, component: impl Into<ComponentRef>) -> ComponentRef {
    let calls = calls.clone();
    let component = component.into();
    ComponentRef::thunk(move || {
        calls.bump();
        component.clone()
    })
}

/// A thunk that records its label in `log` when invoked.
pub fn logged(
    log: &Rc<RefCell<Vec<&'static str>>>,
    label: &'static str,
    component: impl Into<ComponentRef>,
) -> ComponentRef {
    let log = log.clone();
    let component = component.into();
    ComponentRef::thunk(move || {
        log.borrow_mut().push(label);
        component.clone()
    })
}
