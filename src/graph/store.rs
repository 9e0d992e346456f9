use arrow::array::{Array, ArrayRef, Int64Array, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::error::{GraphError, Result};
use crate::graph::weight::{self, Magnitude, Weight};

/// Integer node identifier. Nodes are implicit: any id used as an edge
/// endpoint is a node.
pub type NodeId = u32;

/// A directed, weighted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: Weight,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, weight: Weight) -> Self {
        Edge { from, to, weight }
    }

    /// The normalized, non-negative weight every algorithm uses.
    #[inline]
    pub fn magnitude(&self) -> Magnitude {
        weight::magnitude(self.weight)
    }

    /// The endpoint opposite `node`, treating the edge as undirected.
    #[inline]
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.from == node {
            self.to
        } else {
            self.from
        }
    }
}

/// Append-only directed graph.
///
/// Edges live in a single arena in insertion order; outgoing and incoming
/// adjacency hold indices into it. Self loops and parallel edges are kept
/// as given. Once loaded the store is only read, so a shared `&GraphStore`
/// can be handed to any number of algorithm calls at once.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    edges: Vec<Edge>,
    outgoing: IndexMap<NodeId, Vec<usize>>,
    incoming: IndexMap<NodeId, Vec<usize>>,
    nodes: IndexSet<NodeId>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(edges: usize) -> Self {
        GraphStore {
            edges: Vec::with_capacity(edges),
            ..Self::default()
        }
    }

    /// Build a graph from `(from, to, weight)` triples.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId, Weight)>,
    {
        let mut graph = GraphStore::new();
        for (from, to, weight) in triples {
            graph.add_edge(from, to, weight);
        }
        graph
    }

    /// Create a graph from an edges RecordBatch.
    ///
    /// Expected schema: source (UInt32), target (UInt32), weight (Int64).
    /// The weight column is optional and defaults to 1.
    pub fn from_edges(edges: &RecordBatch) -> Result<Self> {
        if edges.num_columns() < 2 {
            return Err(GraphError::graph_construction(
                "Edges table needs at least source and target columns",
            ));
        }

        let source_array = edges.column(0).as_any().downcast_ref::<UInt32Array>()
            .ok_or_else(|| GraphError::graph_construction(
                "First column of edges table must be UInt32 (source)"
            ))?;

        let target_array = edges.column(1).as_any().downcast_ref::<UInt32Array>()
            .ok_or_else(|| GraphError::graph_construction(
                "Second column of edges table must be UInt32 (target)"
            ))?;

        let weight_array = if edges.num_columns() >= 3 {
            Some(edges.column(2).as_any().downcast_ref::<Int64Array>()
                .ok_or_else(|| GraphError::graph_construction(
                    "Third column of edges table must be Int64 (weight)"
                ))?)
        } else {
            None
        };

        let mut graph = GraphStore::with_capacity(edges.num_rows());
        for i in 0..edges.num_rows() {
            if source_array.is_null(i) || target_array.is_null(i) {
                return Err(GraphError::graph_construction(format!(
                    "Row {} has a null endpoint", i
                )));
            }

            let weight = match weight_array {
                Some(weights) if !weights.is_null(i) => weights.value(i),
                _ => 1,
            };

            graph.add_edge(source_array.value(i), target_array.value(i), weight);
        }

        Ok(graph)
    }

    /// Export the edge arena as a RecordBatch in insertion order.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt32Array::from_iter_values(self.edges.iter().map(|e| e.from))),
            Arc::new(UInt32Array::from_iter_values(self.edges.iter().map(|e| e.to))),
            Arc::new(Int64Array::from_iter_values(self.edges.iter().map(|e| e.weight))),
        ];

        RecordBatch::try_new(Self::edge_schema(), columns).map_err(GraphError::from)
    }

    pub fn edge_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("source", DataType::UInt32, false),
            Field::new("target", DataType::UInt32, false),
            Field::new("weight", DataType::Int64, false),
        ]))
    }

    /// Append an edge, creating adjacency entries as needed. Never fails.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: Weight) {
        let idx = self.edges.len();
        self.edges.push(Edge::new(from, to, weight));
        self.outgoing.entry(from).or_default().push(idx);
        self.incoming.entry(to).or_default().push(idx);
        self.nodes.insert(from);
        self.nodes.insert(to);
    }

    /// Register a node that may have no edges at all.
    pub fn add_node(&mut self, node: NodeId) {
        self.nodes.insert(node);
    }

    /// Outgoing edges of `node` in insertion order; empty for unknown nodes.
    pub fn adjacent(&self, node: NodeId) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.edge_refs(self.outgoing.get(&node))
    }

    /// Incoming edges of `node` in insertion order; empty for unknown nodes.
    pub fn incoming(&self, node: NodeId) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.edge_refs(self.incoming.get(&node))
    }

    /// The `i`-th outgoing edge of `node`, if any.
    pub fn adjacent_at(&self, node: NodeId, i: usize) -> Option<&Edge> {
        self.outgoing
            .get(&node)
            .and_then(|indices| indices.get(i))
            .map(|&idx| &self.edges[idx])
    }

    fn edge_refs<'a>(
        &'a self,
        indices: Option<&'a Vec<usize>>,
    ) -> impl ExactSizeIterator<Item = &'a Edge> + 'a {
        indices
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.edges[i])
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.outgoing.get(&node).map(Vec::len).unwrap_or(0)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Nodes with at least one outgoing edge, in first-seen order.
    pub fn sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing.keys().copied()
    }

    /// Every known node in first-seen order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn has_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn max_node_id(&self) -> Option<NodeId> {
        self.nodes.iter().copied().max()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Copy of the outgoing adjacency with owned edges, for algorithms that
    /// need a private mutable view.
    pub(crate) fn adjacency_snapshot(&self) -> IndexMap<NodeId, Vec<Edge>> {
        self.outgoing
            .iter()
            .map(|(&node, indices)| (node, indices.iter().map(|&i| self.edges[i]).collect()))
            .collect()
    }
}
