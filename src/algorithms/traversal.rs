use arrow::array::UInt32Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use hashbrown::HashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use crate::algorithms::{AlgorithmParams, GraphAlgorithm};
use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, NodeId};

/// Breadth-first visit order from `start`.
///
/// Nodes come out in non-decreasing hop distance, ties in adjacency order.
/// A start node without outgoing edges yields just itself.
pub fn bfs(graph: &GraphStore, start: NodeId) -> Vec<NodeId> {
    bfs_with_depth(graph, start)
        .into_iter()
        .map(|(node, _)| node)
        .collect()
}

/// Breadth-first visit order paired with each node's hop count from `start`.
pub fn bfs_with_depth(graph: &GraphStore, start: NodeId) -> Vec<(NodeId, u32)> {
    let mut order = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    queue.push_back((start, 0u32));

    while let Some((current, depth)) = queue.pop_front() {
        order.push((current, depth));

        for edge in graph.adjacent(current) {
            if visited.insert(edge.to) {
                queue.push_back((edge.to, depth + 1));
            }
        }
    }

    order
}

/// Depth-first visit order from `start`.
///
/// Same order as the recursive formulation (mark on entry, descend into
/// unvisited neighbours in adjacency order) but driven by an explicit stack
/// of `(node, next edge)` frames, so deep graphs cannot exhaust the call stack.
pub fn dfs(graph: &GraphStore, start: NodeId) -> Vec<NodeId> {
    dfs_with_depth(graph, start)
        .into_iter()
        .map(|(node, _)| node)
        .collect()
}

/// Depth-first visit order paired with each node's depth in the DFS tree.
pub fn dfs_with_depth(graph: &GraphStore, start: NodeId) -> Vec<(NodeId, u32)> {
    let mut order = vec![(start, 0u32)];
    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(start);

    let mut stack = vec![(start, 0usize)];

    while let Some(frame) = stack.last_mut() {
        let (node, cursor) = *frame;
        match graph.adjacent_at(node, cursor) {
            Some(edge) => {
                frame.1 += 1;
                if visited.insert(edge.to) {
                    order.push((edge.to, stack.len() as u32));
                    stack.push((edge.to, 0));
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    order
}

fn visit_batch(order: &[(NodeId, u32)]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("node_id", DataType::UInt32, false),
        Field::new("visit_order", DataType::UInt32, false),
        Field::new("depth", DataType::UInt32, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(UInt32Array::from_iter_values(order.iter().map(|(n, _)| *n))),
            Arc::new(UInt32Array::from_iter_values(0..order.len() as u32)),
            Arc::new(UInt32Array::from_iter_values(order.iter().map(|(_, d)| *d))),
        ],
    ).map_err(GraphError::from)
}

pub struct Bfs;

impl GraphAlgorithm for Bfs {
    fn execute(&self, graph: &GraphStore, params: &AlgorithmParams) -> Result<RecordBatch> {
        let start = params.node("start")?;
        visit_batch(&bfs_with_depth(graph, start))
    }

    fn name(&self) -> &'static str {
        "bfs"
    }

    fn description(&self) -> &'static str {
        "Breadth-first traversal from a start node"
    }
}

pub struct Dfs;

impl GraphAlgorithm for Dfs {
    fn execute(&self, graph: &GraphStore, params: &AlgorithmParams) -> Result<RecordBatch> {
        let start = params.node("start")?;
        visit_batch(&dfs_with_depth(graph, start))
    }

    fn name(&self) -> &'static str {
        "dfs"
    }

    fn description(&self) -> &'static str {
        "Depth-first traversal from a start node"
    }
}
