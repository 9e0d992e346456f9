use hashbrown::HashMap;
use serde::Serialize;
use crate::graph::{GraphStore, NodeId};

/// Dense `0..N-1` remap of a graph's node ids, ordered by ascending id.
///
/// Every algorithm that needs array-backed state (the all-pairs table, the
/// union-find forest) indexes through this, so sparse ids such as
/// `{0, 5, 100}` use three slots rather than 101.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeIndex {
    ids: Vec<NodeId>,
    #[serde(skip)]
    positions: HashMap<NodeId, usize>,
}

impl NodeIndex {
    pub fn new(graph: &GraphStore) -> Self {
        let mut ids: Vec<NodeId> = graph.node_ids().collect();
        ids.sort_unstable();

        let positions = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        NodeIndex { ids, positions }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Dense position of `node`, if the graph knows it.
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.positions.get(&node).copied()
    }

    /// Node id stored at dense position `index`.
    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.ids.get(index).copied()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }
}
