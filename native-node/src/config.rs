use crate::toolkit::DirtyFlag;

/// Adapter behaviour shared by every node of a [`NodeContext`](crate::NodeContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    dirty_flag: DirtyFlag,
    invalidate_on_geometry: bool,
}

impl NodeConfig {
    pub fn new() -> Self {
        Self {
            dirty_flag: DirtyFlag::NeedRender,
            invalidate_on_geometry: false,
        }
    }

    /// Flag sent by `mark_dirty()`.
    pub fn with_dirty_flag(mut self, flag: DirtyFlag) -> Self {
        self.dirty_flag = flag;
        self
    }

    /// Follow every successful position/size push with `mark_dirty()`.
    pub fn with_invalidate_on_geometry(mut self, enabled: bool) -> Self {
        self.invalidate_on_geometry = enabled;
        self
    }

    pub fn dirty_flag(&self) -> DirtyFlag {
        self.dirty_flag
    }

    pub fn invalidate_on_geometry(&self) -> bool {
        self.invalidate_on_geometry
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new()
    }
}
