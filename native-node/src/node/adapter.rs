use super::native::NativeNode;
use crate::error::Result;
use crate::event::NodeEvent;
use crate::geometry::{Position, Rect, Size};
use crate::handle::NodeHandle;

/// Engine-side node backed by a native node.
///
/// Concrete node kinds implement this to react to toolkit events and to
/// customise how layout results reach the toolkit. Every method except the
/// accessors has a default: events are ignored, geometry and dirty marking go
/// straight to the wrapped [`NativeNode`].
pub trait NodeAdapter {
    fn node(&self) -> &NativeNode;

    fn node_mut(&mut self) -> &mut NativeNode;

    /// Called synchronously from the toolkit's event dispatch on the UI
    /// thread. Must return quickly and never fail; unhandled kinds are
    /// dropped.
    fn on_node_event(&mut self, _event: &NodeEvent) {}

    fn handle(&self) -> Option<NodeHandle> {
        self.node().handle()
    }

    fn mark_dirty(&self) -> Result<()> {
        self.node().mark_dirty()
    }

    fn set_position(&mut self, position: Position) -> Result<()> {
        self.node_mut().set_position(position).map(|_| ())
    }

    fn set_size(&mut self, size: Size) -> Result<()> {
        self.node_mut().set_size(size).map(|_| ())
    }
}

impl NodeAdapter for NativeNode {
    fn node(&self) -> &NativeNode {
        self
    }

    fn node_mut(&mut self) -> &mut NativeNode {
        self
    }
}

/// Receiver for the user-facing events of a node. All methods default to
/// doing nothing.
pub trait NodeDelegate {
    fn on_click(&mut self) {}

    fn on_appear(&mut self) {}

    fn on_disappear(&mut self) {}

    fn on_area_change(&mut self, _old: Rect, _new: Rect) {}
}
