use crate::config::NodeConfig;
use crate::toolkit::NativeToolkit;
use std::fmt;
use std::rc::Rc;

/// Shared reference to a NodeContext. `Rc` keeps every node on the UI thread.
pub type SharedContext = Rc<NodeContext>;

/// Toolkit binding and configuration shared by all nodes on one UI thread.
pub struct NodeContext {
    toolkit: Box<dyn NativeToolkit>,
    config: NodeConfig,
}

impl NodeContext {
    pub fn new(toolkit: impl NativeToolkit + 'static, config: NodeConfig) -> Self {
        Self {
            toolkit: Box::new(toolkit),
            config,
        }
    }

    /// Build a context with the default [`NodeConfig`], ready to hand to nodes.
    pub fn shared(toolkit: impl NativeToolkit + 'static) -> SharedContext {
        Rc::new(Self::new(toolkit, NodeConfig::default()))
    }

    pub fn toolkit(&self) -> &dyn NativeToolkit {
        self.toolkit.as_ref()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}

impl fmt::Debug for NodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
