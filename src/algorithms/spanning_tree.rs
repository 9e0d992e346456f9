//! Minimum spanning trees over directed input.
//!
//! Both constructions ignore edge direction: every stored edge is a
//! candidate undirected tree edge, and the returned edges are the stored
//! `Edge` values with their original orientation. On a connected
//! undirected-equivalent graph the two agree on total weight.

use arrow::array::{Int64Array, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use hashbrown::HashSet;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;
use crate::algorithms::{AlgorithmParams, GraphAlgorithm};
use crate::error::{GraphError, Result};
use crate::graph::{Edge, GraphStore, Magnitude, NodeId, NodeIndex};

/// Disjoint-set forest over dense node positions, with path compression
/// and union by rank.
#[derive(Debug)]
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression
        let mut current = node;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// Merge the sets of `a` and `b`; false if they were already one set.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);

        if root_a == root_b {
            return false;
        }

        // Union by rank
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }

        true
    }
}

/// Kruskal: edges sorted ascending by magnitude (stable, so equal weights
/// keep input order), accepted when they join two components.
///
/// A disconnected graph yields a spanning forest.
pub fn kruskal(graph: &GraphStore) -> Vec<Edge> {
    let index = NodeIndex::new(graph);
    let mut forest = UnionFind::new(index.len());

    let mut candidates: Vec<Edge> = graph.edges().to_vec();
    candidates.sort_by_key(Edge::magnitude);

    let mut tree = Vec::new();
    for edge in candidates {
        let (Some(a), Some(b)) = (index.position(edge.from), index.position(edge.to)) else {
            continue;
        };

        if forest.union(a, b) {
            tree.push(edge);
            if tree.len() + 1 == index.len() {
                break;
            }
        }
    }

    log::debug!(
        "Kruskal accepted {} of {} edges",
        tree.len(),
        graph.edge_count()
    );
    tree
}

/// Prim from node 0.
pub fn prim(graph: &GraphStore) -> Vec<Edge> {
    prim_from(graph, 0)
}

/// Prim from `start`, spanning the start node's weakly connected component.
///
/// Nodes outside that component are left out. Frontier ties are broken by
/// push order.
pub fn prim_from(graph: &GraphStore, start: NodeId) -> Vec<Edge> {
    let mut tree = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    // (weight, push sequence) orders the min-heap; the edge and the node it
    // leads to ride along.
    let mut frontier: BinaryHeap<Reverse<(Magnitude, usize, FrontierEdge)>> = BinaryHeap::new();
    let mut sequence = 0usize;

    let mut expand = |node: NodeId,
                      visited: &HashSet<NodeId>,
                      frontier: &mut BinaryHeap<Reverse<(Magnitude, usize, FrontierEdge)>>| {
        let outgoing = graph.adjacent(node);
        let incoming = graph.incoming(node);
        for edge in outgoing.chain(incoming) {
            let toward = edge.other(node);
            if !visited.contains(&toward) {
                frontier.push(Reverse((edge.magnitude(), sequence, FrontierEdge { edge: *edge, toward })));
                sequence += 1;
            }
        }
    };

    visited.insert(start);
    expand(start, &visited, &mut frontier);

    while let Some(Reverse((_, _, candidate))) = frontier.pop() {
        // Stale entry: the far end was reached by a cheaper edge meanwhile.
        if !visited.insert(candidate.toward) {
            continue;
        }

        tree.push(candidate.edge);
        expand(candidate.toward, &visited, &mut frontier);
    }

    log::debug!("Prim from {} spanned {} nodes", start, visited.len());
    tree
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEdge {
    edge: Edge,
    toward: NodeId,
}

/// Sum of edge magnitudes, saturating at `u64::MAX`.
pub fn total_weight(edges: &[Edge]) -> u64 {
    edges.iter().map(Edge::magnitude).fold(0, u64::saturating_add)
}

fn tree_batch(tree: &[Edge]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("source", DataType::UInt32, false),
        Field::new("target", DataType::UInt32, false),
        Field::new("weight", DataType::Int64, false),
        Field::new("magnitude", DataType::UInt64, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(UInt32Array::from_iter_values(tree.iter().map(|e| e.from))),
            Arc::new(UInt32Array::from_iter_values(tree.iter().map(|e| e.to))),
            Arc::new(Int64Array::from_iter_values(tree.iter().map(|e| e.weight))),
            Arc::new(UInt64Array::from_iter_values(tree.iter().map(Edge::magnitude))),
        ],
    ).map_err(GraphError::from)
}

pub struct KruskalMst;

impl GraphAlgorithm for KruskalMst {
    fn execute(&self, graph: &GraphStore, _params: &AlgorithmParams) -> Result<RecordBatch> {
        tree_batch(&kruskal(graph))
    }

    fn name(&self) -> &'static str {
        "kruskal_mst"
    }

    fn description(&self) -> &'static str {
        "Minimum spanning forest using Kruskal's algorithm with union-find"
    }
}

pub struct PrimMst;

impl GraphAlgorithm for PrimMst {
    fn execute(&self, graph: &GraphStore, params: &AlgorithmParams) -> Result<RecordBatch> {
        let start: NodeId = params.get("start").unwrap_or(0);
        tree_batch(&prim_from(graph, start))
    }

    fn name(&self) -> &'static str {
        "prim_mst"
    }

    fn description(&self) -> &'static str {
        "Minimum spanning tree of the start node's component using Prim's algorithm"
    }
}
