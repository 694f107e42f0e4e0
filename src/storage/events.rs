//! Change notifications raised by the graph store.
//!
//! Observers are plain closures invoked synchronously, in registration
//! order, on the thread performing the edit. Consumers rely on that to keep
//! index caches in step with the store.

use crate::index::{BitSet, EdgeIndex, NodeIndex};

/// One structural or attribute change. Remap tables map every pre-edit
/// index to its post-edit index (`INVALID_INDEX` for removed elements).
#[derive(Debug, Clone, Copy)]
pub enum GraphEvent<'a> {
    NodesAdded { first: NodeIndex, count: usize },
    NodesInserted { indices: &'a [NodeIndex], remap: &'a [u32] },
    NodesRemoved { indices: &'a [NodeIndex], remap: &'a [u32] },
    EdgesAdded { first: EdgeIndex, count: usize },
    EdgesInserted { indices: &'a [EdgeIndex], remap: &'a [u32] },
    EdgesRemoved { indices: &'a [EdgeIndex], remap: &'a [u32] },
    NodesModified { dirty: &'a BitSet },
}

impl GraphEvent<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            GraphEvent::NodesAdded { .. } => "nodes_added",
            GraphEvent::NodesInserted { .. } => "nodes_inserted",
            GraphEvent::NodesRemoved { .. } => "nodes_removed",
            GraphEvent::EdgesAdded { .. } => "edges_added",
            GraphEvent::EdgesInserted { .. } => "edges_inserted",
            GraphEvent::EdgesRemoved { .. } => "edges_removed",
            GraphEvent::NodesModified { .. } => "nodes_modified",
        }
    }
}

/// Handle returned by `GraphStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Handler = Box<dyn FnMut(&GraphEvent<'_>)>;

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    handlers: Vec<(ObserverId, Handler)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, handler: Handler) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(hid, _)| *hid != id);
        self.handlers.len() != before
    }

    pub(crate) fn emit(&mut self, event: &GraphEvent<'_>) {
        tracing::trace!(event = event.kind(), observers = self.handlers.len(), "graph event");
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers").field("count", &self.handlers.len()).finish()
    }
}
