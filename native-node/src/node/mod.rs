mod adapter;
mod native;
mod stack;
mod text;

pub use adapter::{NodeAdapter, NodeDelegate};
pub use native::NativeNode;
pub use stack::StackNode;
pub use text::TextNode;
