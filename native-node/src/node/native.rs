use crate::context::SharedContext;
use crate::error::{NodeError, Result};
use crate::event::NodeEventKind;
use crate::geometry::{Position, Rect, Size};
use crate::handle::NodeHandle;
use crate::toolkit::{DirtyFlag, NodeAttribute};
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Single owner of a native node handle.
///
/// A `NativeNode` releases its handle through the toolkit when dropped. It is
/// neither `Clone` nor `Send`: ownership moves with the value or through
/// [`take`](Self::take) / [`swap`](Self::swap), and never leaves the UI
/// thread. An empty node (the moved-from state) owns nothing and releases
/// nothing.
pub struct NativeNode {
    context: SharedContext,
    handle: Option<NodeHandle>,
    /// Event kinds subscribed through this node, unsubscribed before release
    events: SmallVec<[NodeEventKind; 4]>,
    position: Option<Position>,
    size: Option<Size>,
}

impl NativeNode {
    /// Take ownership of a handle issued by the toolkit. The handle is trusted
    /// as-is and must not be released by anyone else afterwards.
    pub fn new(context: SharedContext, handle: NodeHandle) -> Self {
        debug!(?handle, "adopted native node");
        Self {
            context,
            handle: Some(handle),
            events: SmallVec::new(),
            position: None,
            size: None,
        }
    }

    pub fn empty(context: SharedContext) -> Self {
        Self {
            context,
            handle: None,
            events: SmallVec::new(),
            position: None,
            size: None,
        }
    }

    /// The owned handle, if any. Borrowed, not transferred: callers must not
    /// release it.
    pub fn handle(&self) -> Option<NodeHandle> {
        self.handle
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Last position pushed to, or reported by, the toolkit
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn registered_events(&self) -> &[NodeEventKind] {
        &self.events
    }

    /// Move ownership into a new node, leaving this one empty.
    pub fn take(&mut self) -> Self {
        let taken = Self {
            context: Rc::clone(&self.context),
            handle: self.handle.take(),
            events: std::mem::take(&mut self.events),
            position: self.position.take(),
            size: self.size.take(),
        };
        debug!(handle = ?taken.handle, "moved native node");
        taken
    }

    /// Exchange ownership with `other`. Nothing is released here; each node
    /// releases whatever it holds when it is dropped.
    pub fn swap(&mut self, other: &mut Self) {
        trace!(from = ?other.handle, to = ?self.handle, "swapped native nodes");
        std::mem::swap(self, other);
    }

    /// Give up ownership without releasing. The caller becomes responsible
    /// for the returned handle, including any event subscriptions on it.
    pub fn into_raw(mut self) -> Option<NodeHandle> {
        self.events.clear();
        self.handle.take()
    }

    fn owned(&self) -> Result<NodeHandle> {
        self.handle.ok_or(NodeError::Empty)
    }

    pub fn set_attribute(&mut self, attribute: NodeAttribute) -> Result<&mut Self> {
        let handle = self.owned()?;
        trace!(?handle, ?attribute, "set attribute");
        self.context.toolkit().set_attribute(handle, &attribute)?;
        Ok(self)
    }

    /// Push `position` and cache it. With `invalidate_on_geometry` the node is
    /// then marked dirty; if only that step fails the position is already
    /// applied in the toolkit, so the cache keeps it and the error is returned.
    pub fn set_position(&mut self, position: Position) -> Result<&mut Self> {
        self.set_attribute(NodeAttribute::Position(position))?;
        self.position = Some(position);
        self.after_geometry()
    }

    /// Push `size` and cache it, with the same failure behaviour as
    /// [`NativeNode::set_position`].
    pub fn set_size(&mut self, size: Size) -> Result<&mut Self> {
        self.set_attribute(NodeAttribute::Size(size))?;
        self.size = Some(size);
        self.after_geometry()
    }

    fn after_geometry(&mut self) -> Result<&mut Self> {
        if self.context.config().invalidate_on_geometry() {
            self.mark_dirty()?;
        }
        Ok(self)
    }

    /// Record a frame reported by the toolkit without pushing it back.
    pub(crate) fn sync_frame(&mut self, frame: Rect) {
        self.position = Some(frame.origin());
        self.size = Some(frame.size());
    }

    /// Flag the node with the configured dirty flag. Repeated calls before the
    /// next frame leave the toolkit in the same state as one call.
    pub fn mark_dirty(&self) -> Result<()> {
        self.mark_dirty_with(self.context.config().dirty_flag())
    }

    pub fn mark_dirty_with(&self, flag: DirtyFlag) -> Result<()> {
        let handle = self.owned()?;
        trace!(?handle, ?flag, "mark dirty");
        self.context.toolkit().mark_dirty(handle, flag)?;
        Ok(())
    }

    /// Subscribe for `kind` with the toolkit. Already subscribed kinds are
    /// left alone.
    pub fn register_event(&mut self, kind: NodeEventKind) -> Result<()> {
        let handle = self.owned()?;
        if self.events.contains(&kind) {
            return Ok(());
        }
        self.context.toolkit().register_event(handle, kind)?;
        self.events.push(kind);
        Ok(())
    }

    pub fn unregister_event(&mut self, kind: NodeEventKind) -> Result<()> {
        let handle = self.owned()?;
        if !self.events.contains(&kind) {
            return Ok(());
        }
        self.context.toolkit().unregister_event(handle, kind)?;
        self.events.retain(|k| *k != kind);
        Ok(())
    }

    pub fn add_child(&self, child: &NativeNode) -> Result<()> {
        let parent = self.owned()?;
        let child = child.owned()?;
        self.context.toolkit().add_child(parent, child)?;
        Ok(())
    }

    pub fn insert_child(&self, child: &NativeNode, index: usize) -> Result<()> {
        let parent = self.owned()?;
        let child = child.owned()?;
        self.context.toolkit().insert_child(parent, child, index)?;
        Ok(())
    }

    pub fn remove_child(&self, child: &NativeNode) -> Result<()> {
        let parent = self.owned()?;
        let child = child.owned()?;
        self.context.toolkit().remove_child(parent, child)?;
        Ok(())
    }
}

impl Drop for NativeNode {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let toolkit = self.context.toolkit();
        for kind in self.events.drain(..) {
            if let Err(err) = toolkit.unregister_event(handle, kind) {
                warn!(?handle, ?kind, %err, "failed to unsubscribe native node event");
            }
        }
        match toolkit.dispose_node(handle) {
            Ok(()) => debug!(?handle, "released native node"),
            Err(err) => warn!(?handle, %err, "failed to release native node"),
        }
    }
}

impl fmt::Debug for NativeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeNode")
            .field("handle", &self.handle)
            .field("events", &self.events)
            .field("position", &self.position)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;
    use crate::context::NodeContext;
    use crate::recording::{RecordingToolkit, ToolkitCall};
    use crate::toolkit::{AttributeKind, ToolkitOp};

    fn handle(raw: usize) -> NodeHandle {
        NodeHandle::from_raw(raw).unwrap()
    }

    fn setup() -> (RecordingToolkit, SharedContext) {
        let toolkit = RecordingToolkit::new();
        let context = NodeContext::shared(toolkit.clone());
        (toolkit, context)
    }

    #[test]
    fn test_new_owns_handle() {
        let (_toolkit, context) = setup();
        let node = NativeNode::new(context, handle(1));
        assert_eq!(node.handle(), Some(handle(1)));
        assert!(!node.is_empty());
    }

    #[test]
    fn test_take_empties_source() {
        let (toolkit, context) = setup();
        let mut a = NativeNode::new(context, handle(1));

        let b = a.take();

        assert_eq!(b.handle(), Some(handle(1)));
        assert_eq!(a.handle(), None);
        assert!(toolkit.calls().is_empty());
    }

    #[test]
    fn test_swap_exchanges_without_release() {
        let (toolkit, context) = setup();
        let mut a = NativeNode::new(context.clone(), handle(1));
        let mut b = NativeNode::new(context, handle(2));

        a.swap(&mut b);

        assert_eq!(a.handle(), Some(handle(2)));
        assert_eq!(b.handle(), Some(handle(1)));
        assert!(toolkit.calls().is_empty());
    }

    #[test]
    fn test_swap_with_empty() {
        let (toolkit, context) = setup();
        let mut a = NativeNode::empty(context.clone());
        let mut b = NativeNode::new(context, handle(3));

        a.swap(&mut b);
        drop(b);
        assert_eq!(toolkit.dispose_count(handle(3)), 0);

        drop(a);
        assert_eq!(toolkit.dispose_count(handle(3)), 1);
    }

    #[test]
    fn test_drop_releases_once() {
        let (toolkit, context) = setup();
        drop(NativeNode::new(context, handle(1)));
        assert_eq!(toolkit.calls(), vec![ToolkitCall::Dispose(handle(1))]);
    }

    #[test]
    fn test_drop_empty_releases_nothing() {
        let (toolkit, context) = setup();
        drop(NativeNode::empty(context));
        assert!(toolkit.calls().is_empty());
    }

    #[test]
    fn test_into_raw_skips_release() {
        let (toolkit, context) = setup();
        let mut node = NativeNode::new(context, handle(5));
        node.register_event(NodeEventKind::Click).unwrap();
        toolkit.clear_calls();

        assert_eq!(node.into_raw(), Some(handle(5)));
        assert!(toolkit.calls().is_empty());
    }

    #[test]
    fn test_geometry_is_pushed_and_cached() {
        let (toolkit, context) = setup();
        let mut node = NativeNode::new(context, handle(1));

        node.set_position(Position::new(10.0, 20.0))
            .unwrap()
            .set_size(Size::new(100.0, 40.0))
            .unwrap();

        assert_eq!(node.position(), Some(Position::new(10.0, 20.0)));
        assert_eq!(node.size(), Some(Size::new(100.0, 40.0)));
        assert_eq!(
            toolkit.attribute(handle(1), AttributeKind::Size),
            Some(NodeAttribute::Size(Size::new(100.0, 40.0)))
        );
        // No implicit invalidation by default
        assert!(toolkit.dirty_flags(handle(1)).is_empty());
    }

    #[test]
    fn test_geometry_invalidates_when_configured() {
        let toolkit = RecordingToolkit::new();
        let config = NodeConfig::new().with_invalidate_on_geometry(true);
        let context = Rc::new(NodeContext::new(toolkit.clone(), config));
        let mut node = NativeNode::new(context, handle(1));

        node.set_position(Position::new(1.0, 1.0)).unwrap();

        assert_eq!(
            toolkit.calls(),
            vec![
                ToolkitCall::SetAttribute(
                    handle(1),
                    NodeAttribute::Position(Position::new(1.0, 1.0))
                ),
                ToolkitCall::MarkDirty(handle(1), DirtyFlag::NeedRender),
            ]
        );
    }

    #[test]
    fn test_failed_invalidate_keeps_pushed_geometry() {
        let toolkit = RecordingToolkit::new();
        let config = NodeConfig::new().with_invalidate_on_geometry(true);
        let context = Rc::new(NodeContext::new(toolkit.clone(), config));
        let mut node = NativeNode::new(context, handle(1));
        toolkit.fail_on(ToolkitOp::MarkDirty, 7);

        let err = node.set_position(Position::new(3.0, 4.0)).unwrap_err();

        assert_eq!(
            err,
            NodeError::Toolkit(crate::error::ToolkitError::new(ToolkitOp::MarkDirty, 7))
        );
        assert_eq!(
            toolkit.attribute(handle(1), AttributeKind::Position),
            Some(NodeAttribute::Position(Position::new(3.0, 4.0)))
        );
        assert_eq!(node.position(), Some(Position::new(3.0, 4.0)));
    }

    #[test]
    fn test_mark_dirty_uses_configured_flag() {
        let toolkit = RecordingToolkit::new();
        let config = NodeConfig::new().with_dirty_flag(DirtyFlag::NeedLayout);
        let context = Rc::new(NodeContext::new(toolkit.clone(), config));
        let node = NativeNode::new(context, handle(1));

        node.mark_dirty().unwrap();
        node.mark_dirty_with(DirtyFlag::NeedRender).unwrap();

        assert_eq!(
            toolkit.calls(),
            vec![
                ToolkitCall::MarkDirty(handle(1), DirtyFlag::NeedLayout),
                ToolkitCall::MarkDirty(handle(1), DirtyFlag::NeedRender),
            ]
        );
    }

    #[test]
    fn test_failed_push_keeps_cache() {
        let (toolkit, context) = setup();
        let mut node = NativeNode::new(context, handle(1));
        toolkit.fail_on(ToolkitOp::SetAttribute, 100);

        let err = node.set_size(Size::new(5.0, 5.0)).unwrap_err();

        assert_eq!(
            err,
            NodeError::Toolkit(crate::error::ToolkitError::new(ToolkitOp::SetAttribute, 100))
        );
        assert_eq!(node.size(), None);
    }

    #[test]
    fn test_empty_node_rejects_operations() {
        let (toolkit, context) = setup();
        let mut node = NativeNode::empty(context.clone());
        let child = NativeNode::new(context, handle(2));

        assert_eq!(node.mark_dirty(), Err(NodeError::Empty));
        assert_eq!(
            node.set_position(Position::default()).unwrap_err(),
            NodeError::Empty
        );
        assert_eq!(node.register_event(NodeEventKind::Click), Err(NodeError::Empty));
        assert_eq!(node.add_child(&child), Err(NodeError::Empty));
        assert_eq!(child.add_child(&node), Err(NodeError::Empty));
        assert!(toolkit.calls().is_empty());
    }

    #[test]
    fn test_register_event_once() {
        let (toolkit, context) = setup();
        let mut node = NativeNode::new(context, handle(1));

        node.register_event(NodeEventKind::Click).unwrap();
        node.register_event(NodeEventKind::Click).unwrap();
        assert_eq!(node.registered_events(), &[NodeEventKind::Click]);
        assert_eq!(toolkit.calls().len(), 1);

        node.unregister_event(NodeEventKind::Click).unwrap();
        node.unregister_event(NodeEventKind::Click).unwrap();
        assert!(node.registered_events().is_empty());
        assert!(!toolkit.is_subscribed(handle(1), NodeEventKind::Click));
        assert_eq!(toolkit.calls().len(), 2);
    }

    #[test]
    fn test_drop_unsubscribes_before_release() {
        let (toolkit, context) = setup();
        let mut node = NativeNode::new(context, handle(1));
        node.register_event(NodeEventKind::Appear).unwrap();
        toolkit.clear_calls();

        drop(node);

        assert_eq!(
            toolkit.calls(),
            vec![
                ToolkitCall::UnregisterEvent(handle(1), NodeEventKind::Appear),
                ToolkitCall::Dispose(handle(1)),
            ]
        );
    }

    #[test]
    fn test_drop_survives_toolkit_failure() {
        let (toolkit, context) = setup();
        toolkit.fail_on(ToolkitOp::DisposeNode, 1);

        drop(NativeNode::new(context, handle(1)));

        assert_eq!(toolkit.dispose_count(handle(1)), 1);
        assert!(!toolkit.is_disposed(handle(1)));
    }

    #[test]
    fn test_child_operations() {
        let (toolkit, context) = setup();
        let parent = NativeNode::new(context.clone(), handle(1));
        let first = NativeNode::new(context.clone(), handle(2));
        let second = NativeNode::new(context, handle(3));

        parent.add_child(&first).unwrap();
        parent.insert_child(&second, 0).unwrap();
        assert_eq!(toolkit.children(handle(1)), vec![handle(3), handle(2)]);

        parent.remove_child(&first).unwrap();
        assert_eq!(toolkit.children(handle(1)), vec![handle(3)]);
    }
}
