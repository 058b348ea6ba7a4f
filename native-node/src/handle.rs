use std::fmt;
use std::num::NonZeroUsize;

/// Opaque reference to a node living in the native toolkit's tree.
///
/// A handle is only an identifier. Copying it never copies ownership: the
/// [`NativeNode`](crate::NativeNode) holding it is the single owner that
/// releases it. The toolkit's null handle has no representation here, an
/// empty owner holds `None` instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeHandle(NonZeroUsize);

impl NodeHandle {
    /// Wrap a raw handle value. Returns `None` for the toolkit's null handle.
    pub fn from_raw(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    /// Wrap a pointer-shaped handle as issued by C toolkits.
    pub fn from_ptr<T>(ptr: *mut T) -> Option<Self> {
        Self::from_raw(ptr as usize)
    }

    pub fn as_raw(self) -> usize {
        self.0.get()
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle({:#x})", self.0.get())
    }
}
