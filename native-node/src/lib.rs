pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod geometry;
pub mod handle;
pub mod node;
pub mod recording;
pub mod registry;
pub mod toolkit;

// Re-export key types
pub use config::NodeConfig;
pub use context::{NodeContext, SharedContext};
pub use error::{NodeError, Result, ToolkitError};
pub use event::{NodeEvent, NodeEventKind};
pub use geometry::{Position, Rect, Size};
pub use handle::NodeHandle;
pub use node::{NativeNode, NodeAdapter, NodeDelegate, StackNode, TextNode};
pub use recording::{RecordingToolkit, ToolkitCall};
pub use registry::NodeRegistry;
pub use toolkit::{AttributeKind, DirtyFlag, NativeToolkit, NodeAttribute, ToolkitOp};
