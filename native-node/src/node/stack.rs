use super::adapter::{NodeAdapter, NodeDelegate};
use super::native::NativeNode;
use crate::error::Result;
use crate::event::{NodeEvent, NodeEventKind};
use std::fmt;
use tracing::trace;

/// Events a stack forwards to its delegate.
const STACK_EVENTS: [NodeEventKind; 4] = [
    NodeEventKind::Click,
    NodeEventKind::Appear,
    NodeEventKind::Disappear,
    NodeEventKind::AreaChange,
];

/// Container node. Children are native nodes owned elsewhere in the engine's
/// tree; the stack only links them in the toolkit.
pub struct StackNode {
    node: NativeNode,
    delegate: Option<Box<dyn NodeDelegate>>,
}

impl StackNode {
    pub fn new(node: NativeNode) -> Self {
        Self {
            node,
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: impl NodeDelegate + 'static) {
        self.delegate = Some(Box::new(delegate));
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// Subscribe for click, appear, disappear and area-change events.
    pub fn enable_events(&mut self) -> Result<()> {
        for kind in STACK_EVENTS {
            self.node.register_event(kind)?;
        }
        Ok(())
    }

    pub fn disable_events(&mut self) -> Result<()> {
        for kind in STACK_EVENTS {
            self.node.unregister_event(kind)?;
        }
        Ok(())
    }

    pub fn add_child(&self, child: &dyn NodeAdapter) -> Result<()> {
        self.node.add_child(child.node())
    }

    pub fn insert_child(&self, child: &dyn NodeAdapter, index: usize) -> Result<()> {
        self.node.insert_child(child.node(), index)
    }

    pub fn remove_child(&self, child: &dyn NodeAdapter) -> Result<()> {
        self.node.remove_child(child.node())
    }
}

impl NodeAdapter for StackNode {
    fn node(&self) -> &NativeNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NativeNode {
        &mut self.node
    }

    fn on_node_event(&mut self, event: &NodeEvent) {
        if self.node.handle() != Some(event.target()) {
            trace!(target_node = ?event.target(), "ignoring event for another node");
            return;
        }

        if let NodeEvent::AreaChange { new, .. } = event {
            self.node.sync_frame(*new);
        }

        let Some(delegate) = self.delegate.as_mut() else {
            return;
        };
        match event {
            NodeEvent::Click { .. } => delegate.on_click(),
            NodeEvent::Appear { .. } => delegate.on_appear(),
            NodeEvent::Disappear { .. } => delegate.on_disappear(),
            NodeEvent::AreaChange { old, new, .. } => delegate.on_area_change(*old, *new),
            NodeEvent::Touch { .. } => {}
        }
    }
}

impl fmt::Debug for StackNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackNode")
            .field("node", &self.node)
            .field("has_delegate", &self.delegate.is_some())
            .finish()
    }
}
