use crate::toolkit::ToolkitOp;
use thiserror::Error;

/// Failure reported by the native toolkit, with its raw error code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("toolkit rejected {op} (error code {code})")]
pub struct ToolkitError {
    pub op: ToolkitOp,
    pub code: i32,
}

impl ToolkitError {
    pub fn new(op: ToolkitOp, code: i32) -> Self {
        Self { op, code }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    #[error("node adapter does not own a native handle")]
    Empty,

    #[error("node adapter is already borrowed")]
    Busy,

    #[error(transparent)]
    Toolkit(#[from] ToolkitError),
}

pub type Result<T> = std::result::Result<T, NodeError>;
