use crate::error::ToolkitError;
use crate::event::NodeEventKind;
use crate::geometry::{Position, Size};
use crate::handle::NodeHandle;
use smartstring::{LazyCompact, SmartString};
use std::fmt;

/// Result of a single toolkit call.
pub type ToolkitResult = std::result::Result<(), ToolkitError>;

/// Native UI toolkit boundary.
///
/// Implementations wrap the platform's node API (ArkUI, a test recorder, ...).
/// Every call happens on the UI thread that owns the toolkit, so receivers
/// are `&self` and implementations keep their own interior state.
pub trait NativeToolkit {
    /// Destroy a node. Called exactly once per owned handle.
    fn dispose_node(&self, handle: NodeHandle) -> ToolkitResult;

    fn set_attribute(&self, handle: NodeHandle, attribute: &NodeAttribute) -> ToolkitResult;

    /// Flag a node for re-measure, re-layout or re-render on the next frame.
    /// Flagging an already flagged node has no further effect.
    fn mark_dirty(&self, handle: NodeHandle, flag: DirtyFlag) -> ToolkitResult;

    /// Subscribe for events of `kind` targeting `handle`.
    fn register_event(&self, handle: NodeHandle, kind: NodeEventKind) -> ToolkitResult;

    fn unregister_event(&self, handle: NodeHandle, kind: NodeEventKind) -> ToolkitResult;

    fn add_child(&self, parent: NodeHandle, child: NodeHandle) -> ToolkitResult;

    fn insert_child(&self, parent: NodeHandle, child: NodeHandle, index: usize) -> ToolkitResult;

    fn remove_child(&self, parent: NodeHandle, child: NodeHandle) -> ToolkitResult;
}

/// Toolkit operations, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolkitOp {
    DisposeNode,
    SetAttribute,
    MarkDirty,
    RegisterEvent,
    UnregisterEvent,
    AddChild,
    InsertChild,
    RemoveChild,
}

impl ToolkitOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolkitOp::DisposeNode => "dispose_node",
            ToolkitOp::SetAttribute => "set_attribute",
            ToolkitOp::MarkDirty => "mark_dirty",
            ToolkitOp::RegisterEvent => "register_event",
            ToolkitOp::UnregisterEvent => "unregister_event",
            ToolkitOp::AddChild => "add_child",
            ToolkitOp::InsertChild => "insert_child",
            ToolkitOp::RemoveChild => "remove_child",
        }
    }
}

impl fmt::Display for ToolkitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass the toolkit should run for a dirty node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DirtyFlag {
    NeedMeasure,
    NeedLayout,
    NeedRender,
}

/// Attribute values the adapter pushes into a native node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeAttribute {
    Position(Position),
    Size(Size),
    Opacity(f32),
    /// ARGB
    BackgroundColor(u32),
    Visible(bool),
    Id(SmartString<LazyCompact>),
    Text(SmartString<LazyCompact>),
    FontSize(f32),
}

/// Discriminant of [`NodeAttribute`], one slot per attribute on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    Size,
    Opacity,
    BackgroundColor,
    Visible,
    Id,
    Text,
    FontSize,
}

impl NodeAttribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            NodeAttribute::Position(_) => AttributeKind::Position,
            NodeAttribute::Size(_) => AttributeKind::Size,
            NodeAttribute::Opacity(_) => AttributeKind::Opacity,
            NodeAttribute::BackgroundColor(_) => AttributeKind::BackgroundColor,
            NodeAttribute::Visible(_) => AttributeKind::Visible,
            NodeAttribute::Id(_) => AttributeKind::Id,
            NodeAttribute::Text(_) => AttributeKind::Text,
            NodeAttribute::FontSize(_) => AttributeKind::FontSize,
        }
    }
}
