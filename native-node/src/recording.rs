use crate::error::ToolkitError;
use crate::event::NodeEventKind;
use crate::handle::NodeHandle;
use crate::toolkit::{
    AttributeKind, DirtyFlag, NativeToolkit, NodeAttribute, ToolkitOp, ToolkitResult,
};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

/// One call received by a [`RecordingToolkit`].
#[derive(Debug, Clone, PartialEq)]
pub enum ToolkitCall {
    Dispose(NodeHandle),
    SetAttribute(NodeHandle, NodeAttribute),
    MarkDirty(NodeHandle, DirtyFlag),
    RegisterEvent(NodeHandle, NodeEventKind),
    UnregisterEvent(NodeHandle, NodeEventKind),
    AddChild {
        parent: NodeHandle,
        child: NodeHandle,
    },
    InsertChild {
        parent: NodeHandle,
        child: NodeHandle,
        index: usize,
    },
    RemoveChild {
        parent: NodeHandle,
        child: NodeHandle,
    },
}

/// Observable node-tree state, the part a real toolkit would render from.
#[derive(Debug, Default)]
struct ToolkitState {
    dirty: HashMap<NodeHandle, BTreeSet<DirtyFlag>>,
    attributes: HashMap<(NodeHandle, AttributeKind), NodeAttribute>,
    children: HashMap<NodeHandle, Vec<NodeHandle>>,
    subscriptions: HashSet<(NodeHandle, NodeEventKind)>,
    disposed: HashSet<NodeHandle>,
    failures: HashMap<ToolkitOp, i32>,
}

/// In-process toolkit that records every call for inspection.
///
/// Clones share the same log and state, so a test keeps one clone and hands
/// the other to a [`NodeContext`](crate::NodeContext).
#[derive(Debug, Clone, Default)]
pub struct RecordingToolkit {
    log: Rc<RefCell<Vec<ToolkitCall>>>,
    state: Rc<RefCell<ToolkitState>>,
}

impl RecordingToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RecordingToolkit writing into an existing call log
    pub fn with_log(log: Rc<RefCell<Vec<ToolkitCall>>>) -> Self {
        Self {
            log,
            state: Rc::default(),
        }
    }

    pub fn calls(&self) -> Vec<ToolkitCall> {
        self.log.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<ToolkitCall> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }

    /// Number of release calls received for `handle`.
    pub fn dispose_count(&self, handle: NodeHandle) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|call| matches!(call, ToolkitCall::Dispose(h) if *h == handle))
            .count()
    }

    pub fn is_disposed(&self, handle: NodeHandle) -> bool {
        self.state.borrow().disposed.contains(&handle)
    }

    /// Pending dirty flags for `handle`, in pass order.
    pub fn dirty_flags(&self, handle: NodeHandle) -> Vec<DirtyFlag> {
        self.state
            .borrow()
            .dirty
            .get(&handle)
            .map(|flags| flags.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn attribute(&self, handle: NodeHandle, kind: AttributeKind) -> Option<NodeAttribute> {
        self.state.borrow().attributes.get(&(handle, kind)).cloned()
    }

    pub fn children(&self, parent: NodeHandle) -> Vec<NodeHandle> {
        self.state
            .borrow()
            .children
            .get(&parent)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, handle: NodeHandle, kind: NodeEventKind) -> bool {
        self.state.borrow().subscriptions.contains(&(handle, kind))
    }

    /// Simulate a frame: clear every pending dirty flag and return the nodes
    /// that were dirty, sorted.
    pub fn render_frame(&self) -> Vec<NodeHandle> {
        let mut state = self.state.borrow_mut();
        let mut rendered: Vec<NodeHandle> = state.dirty.drain().map(|(handle, _)| handle).collect();
        rendered.sort();
        rendered
    }

    /// Make every subsequent call of `op` fail with `code`.
    pub fn fail_on(&self, op: ToolkitOp, code: i32) {
        self.state.borrow_mut().failures.insert(op, code);
    }

    pub fn clear_failures(&self) {
        self.state.borrow_mut().failures.clear();
    }

    /// Record the call, then either fail it or apply it to the state.
    fn record(
        &self,
        op: ToolkitOp,
        call: ToolkitCall,
        apply: impl FnOnce(&mut ToolkitState),
    ) -> ToolkitResult {
        self.log.borrow_mut().push(call);
        let mut state = self.state.borrow_mut();
        if let Some(&code) = state.failures.get(&op) {
            return Err(ToolkitError::new(op, code));
        }
        apply(&mut *state);
        Ok(())
    }
}

impl NativeToolkit for RecordingToolkit {
    fn dispose_node(&self, handle: NodeHandle) -> ToolkitResult {
        self.record(ToolkitOp::DisposeNode, ToolkitCall::Dispose(handle), |state| {
            state.dirty.remove(&handle);
            state.attributes.retain(|(h, _), _| *h != handle);
            state.subscriptions.retain(|(h, _)| *h != handle);
            state.children.remove(&handle);
            for siblings in state.children.values_mut() {
                siblings.retain(|child| *child != handle);
            }
            state.disposed.insert(handle);
        })
    }

    fn set_attribute(&self, handle: NodeHandle, attribute: &NodeAttribute) -> ToolkitResult {
        self.record(
            ToolkitOp::SetAttribute,
            ToolkitCall::SetAttribute(handle, attribute.clone()),
            |state| {
                state
                    .attributes
                    .insert((handle, attribute.kind()), attribute.clone());
            },
        )
    }

    fn mark_dirty(&self, handle: NodeHandle, flag: DirtyFlag) -> ToolkitResult {
        self.record(
            ToolkitOp::MarkDirty,
            ToolkitCall::MarkDirty(handle, flag),
            |state| {
                state.dirty.entry(handle).or_default().insert(flag);
            },
        )
    }

    fn register_event(&self, handle: NodeHandle, kind: NodeEventKind) -> ToolkitResult {
        self.record(
            ToolkitOp::RegisterEvent,
            ToolkitCall::RegisterEvent(handle, kind),
            |state| {
                state.subscriptions.insert((handle, kind));
            },
        )
    }

    fn unregister_event(&self, handle: NodeHandle, kind: NodeEventKind) -> ToolkitResult {
        self.record(
            ToolkitOp::UnregisterEvent,
            ToolkitCall::UnregisterEvent(handle, kind),
            |state| {
                state.subscriptions.remove(&(handle, kind));
            },
        )
    }

    fn add_child(&self, parent: NodeHandle, child: NodeHandle) -> ToolkitResult {
        self.record(
            ToolkitOp::AddChild,
            ToolkitCall::AddChild { parent, child },
            |state| {
                state.children.entry(parent).or_default().push(child);
            },
        )
    }

    fn insert_child(&self, parent: NodeHandle, child: NodeHandle, index: usize) -> ToolkitResult {
        self.record(
            ToolkitOp::InsertChild,
            ToolkitCall::InsertChild {
                parent,
                child,
                index,
            },
            |state| {
                let children = state.children.entry(parent).or_default();
                let index = index.min(children.len());
                children.insert(index, child);
            },
        )
    }

    fn remove_child(&self, parent: NodeHandle, child: NodeHandle) -> ToolkitResult {
        self.record(
            ToolkitOp::RemoveChild,
            ToolkitCall::RemoveChild { parent, child },
            |state| {
                if let Some(children) = state.children.get_mut(&parent) {
                    children.retain(|c| *c != child);
                }
            },
        )
    }
}
