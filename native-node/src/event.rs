use crate::geometry::{Position, Rect};
use crate::handle::NodeHandle;

/// Event kinds a node can subscribe for with the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEventKind {
    Click,
    Appear,
    Disappear,
    AreaChange,
    Touch,
}

/// Native events delivered by the toolkit to a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    Click { target: NodeHandle },
    Appear { target: NodeHandle },
    Disappear { target: NodeHandle },
    /// The node's frame changed after a toolkit layout pass
    AreaChange {
        target: NodeHandle,
        old: Rect,
        new: Rect,
    },
    Touch {
        target: NodeHandle,
        position: Position,
    },
}

impl NodeEvent {
    /// Get the native node this event targets
    pub fn target(&self) -> NodeHandle {
        match self {
            NodeEvent::Click { target } => *target,
            NodeEvent::Appear { target } => *target,
            NodeEvent::Disappear { target } => *target,
            NodeEvent::AreaChange { target, .. } => *target,
            NodeEvent::Touch { target, .. } => *target,
        }
    }

    pub fn kind(&self) -> NodeEventKind {
        match self {
            NodeEvent::Click { .. } => NodeEventKind::Click,
            NodeEvent::Appear { .. } => NodeEventKind::Appear,
            NodeEvent::Disappear { .. } => NodeEventKind::Disappear,
            NodeEvent::AreaChange { .. } => NodeEventKind::AreaChange,
            NodeEvent::Touch { .. } => NodeEventKind::Touch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(raw: usize) -> NodeHandle {
        NodeHandle::from_raw(raw).unwrap()
    }

    #[test]
    fn test_event_target_and_kind() {
        let click = NodeEvent::Click { target: handle(1) };
        assert_eq!(click.target(), handle(1));
        assert_eq!(click.kind(), NodeEventKind::Click);

        let area = NodeEvent::AreaChange {
            target: handle(2),
            old: Rect::default(),
            new: Rect::new(0.0, 0.0, 20.0, 20.0),
        };
        assert_eq!(area.target(), handle(2));
        assert_eq!(area.kind(), NodeEventKind::AreaChange);

        let touch = NodeEvent::Touch {
            target: handle(3),
            position: Position::new(1.0, 1.0),
        };
        assert_eq!(touch.target(), handle(3));
        assert_eq!(touch.kind(), NodeEventKind::Touch);
    }
}
