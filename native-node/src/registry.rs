use crate::error::{NodeError, Result};
use crate::event::NodeEvent;
use crate::handle::NodeHandle;
use crate::node::NodeAdapter;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use tracing::{debug, error, trace, warn};

/// Routes toolkit events to the adapter owning the target handle.
///
/// The registry holds weak references only: dropping an adapter is enough to
/// stop delivery to it, stale entries are pruned on the next dispatch.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: HashMap<NodeHandle, Weak<RefCell<dyn NodeAdapter>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under the handle it currently owns. An adapter
    /// whose handle later changes (`take`, `swap`) stops receiving events for
    /// the old handle and must be registered again.
    pub fn register<A: NodeAdapter + 'static>(
        &mut self,
        adapter: &Rc<RefCell<A>>,
    ) -> Result<NodeHandle> {
        let handle = adapter
            .try_borrow()
            .map_err(|_| NodeError::Busy)?
            .handle()
            .ok_or(NodeError::Empty)?;
        let weak = Rc::downgrade(adapter);
        let weak: Weak<RefCell<dyn NodeAdapter>> = weak;
        self.nodes.insert(handle, weak);
        debug!(?handle, "registered node for events");
        Ok(handle)
    }

    pub fn unregister(&mut self, handle: NodeHandle) -> bool {
        self.nodes.remove(&handle).is_some()
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop entries whose adapter no longer exists.
    pub fn prune(&mut self) {
        self.nodes.retain(|_, node| node.strong_count() > 0);
    }

    /// Deliver `event` to its target. Returns whether an adapter handled it.
    ///
    /// Never panics: unknown targets, adapters that no longer own the target,
    /// re-entrant delivery and panicking handlers are logged and reported as
    /// `false`.
    pub fn dispatch(&mut self, event: &NodeEvent) -> bool {
        let target = event.target();
        let adapter = match self.nodes.get(&target).map(Weak::upgrade) {
            Some(Some(adapter)) => adapter,
            Some(None) => {
                debug!(?target, "dropping event for released node");
                self.nodes.remove(&target);
                return false;
            }
            None => {
                trace!(?target, kind = ?event.kind(), "no node registered for event");
                return false;
            }
        };

        let Ok(mut node) = adapter.try_borrow_mut() else {
            warn!(?target, kind = ?event.kind(), "dropping re-entrant node event");
            return false;
        };

        if node.handle() != Some(target) {
            debug!(?target, owner = ?node.handle(), "dropping event for moved node");
            drop(node);
            self.nodes.remove(&target);
            return false;
        }

        trace!(?target, kind = ?event.kind(), "dispatching node event");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| node.on_node_event(event)));
        match outcome {
            Ok(()) => true,
            Err(payload) => {
                error!(
                    ?target,
                    kind = ?event.kind(),
                    "node event handler panicked: {}",
                    panic_message(&*payload)
                );
                false
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .finish()
    }
}
