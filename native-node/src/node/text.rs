use super::adapter::NodeAdapter;
use super::native::NativeNode;
use crate::error::Result;
use crate::toolkit::{DirtyFlag, NodeAttribute};
use smartstring::{LazyCompact, SmartString};

/// Leaf node showing a run of text. Content changes need a re-measure, so
/// they flag the node [`DirtyFlag::NeedMeasure`].
#[derive(Debug)]
pub struct TextNode {
    node: NativeNode,
    text: SmartString<LazyCompact>,
    font_size: Option<f32>,
}

impl TextNode {
    pub fn new(node: NativeNode) -> Self {
        Self {
            node,
            text: SmartString::new(),
            font_size: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    pub fn set_text(&mut self, text: &str) -> Result<()> {
        if self.text.as_str() == text {
            return Ok(());
        }
        let text: SmartString<LazyCompact> = text.into();
        self.node.set_attribute(NodeAttribute::Text(text.clone()))?;
        self.text = text;
        self.node.mark_dirty_with(DirtyFlag::NeedMeasure)
    }

    pub fn set_font_size(&mut self, size: f32) -> Result<()> {
        if self.font_size == Some(size) {
            return Ok(());
        }
        self.node.set_attribute(NodeAttribute::FontSize(size))?;
        self.font_size = Some(size);
        self.node.mark_dirty_with(DirtyFlag::NeedMeasure)
    }
}

impl NodeAdapter for TextNode {
    fn node(&self) -> &NativeNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NativeNode {
        &mut self.node
    }
}
