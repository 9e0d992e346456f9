use arrow::array::builder::{ListBuilder, UInt32Builder};
use arrow::array::{UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use hashbrown::HashSet;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use crate::algorithms::{AlgorithmParams, GraphAlgorithm};
use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, Magnitude, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResidualEdge {
    to: NodeId,
    capacity: Magnitude,
}

/// Private, mutable copy of a graph's capacities.
///
/// Built once per flow computation and never shared with the source graph.
/// Forward edges lose capacity as flow is pushed; reverse edges are created
/// on demand and gain it.
#[derive(Debug, Clone)]
struct ResidualGraph {
    adjacency: IndexMap<NodeId, Vec<ResidualEdge>>,
}

impl ResidualGraph {
    fn new(graph: &GraphStore) -> Self {
        let adjacency = graph
            .adjacency_snapshot()
            .into_iter()
            .map(|(node, edges)| {
                let residual = edges
                    .iter()
                    .map(|e| ResidualEdge { to: e.to, capacity: e.magnitude() })
                    .collect();
                (node, residual)
            })
            .collect();

        ResidualGraph { adjacency }
    }

    fn edges(&self, node: NodeId) -> &[ResidualEdge] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Depth-first search for a source-to-sink path over edges with positive
    /// residual capacity. Each hop is `(from, edge slot in from's list)`.
    fn augmenting_path(&self, source: NodeId, sink: NodeId) -> Option<Vec<(NodeId, usize)>> {
        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(source);

        // Frames: (node, next edge slot to try)
        let mut stack: Vec<(NodeId, usize)> = vec![(source, 0)];

        while let Some(&(node, cursor)) = stack.last() {
            if node == sink {
                // Every frame but the sink's points one past the edge it took.
                stack.pop();
                return Some(stack.into_iter().map(|(n, next)| (n, next - 1)).collect());
            }

            let edges = self.edges(node);
            let next = edges[cursor.min(edges.len())..]
                .iter()
                .position(|e| e.capacity > 0 && !visited.contains(&e.to))
                .map(|offset| cursor + offset);

            match next {
                Some(slot) => {
                    let to = edges[slot].to;
                    if let Some(frame) = stack.last_mut() {
                        frame.1 = slot + 1;
                    }
                    visited.insert(to);
                    stack.push((to, 0));
                }
                None => {
                    stack.pop();
                }
            }
        }

        None
    }

    fn bottleneck(&self, path: &[(NodeId, usize)]) -> Magnitude {
        path.iter()
            .map(|&(node, slot)| self.adjacency[&node][slot].capacity)
            .min()
            .unwrap_or(0)
    }

    /// Push `amount` along `path`, updating forward and reverse capacities.
    fn augment(&mut self, path: &[(NodeId, usize)], amount: Magnitude) {
        for &(from, slot) in path {
            let to = {
                let edge = &mut self.adjacency[&from][slot];
                edge.capacity -= amount;
                edge.to
            };

            let reverse = self.adjacency.entry(to).or_default();
            match reverse.iter_mut().find(|e| e.to == from) {
                Some(edge) => edge.capacity = edge.capacity.saturating_add(amount),
                None => reverse.push(ResidualEdge { to: from, capacity: amount }),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Augmentation {
    pub path: Vec<NodeId>,
    pub bottleneck: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaxFlowResult {
    pub source: NodeId,
    pub sink: NodeId,
    pub value: u64,
    pub augmentations: Vec<Augmentation>,
}

/// Ford-Fulkerson with depth-first augmenting paths.
///
/// Capacities are edge magnitudes, so each augmentation pushes at least one
/// unit and the loop ends after at most the total capacity leaving `source`.
/// `source == sink` carries no flow.
pub fn ford_fulkerson(graph: &GraphStore, source: NodeId, sink: NodeId) -> MaxFlowResult {
    let mut result = MaxFlowResult {
        source,
        sink,
        value: 0,
        augmentations: Vec::new(),
    };

    if source == sink {
        return result;
    }

    let mut residual = ResidualGraph::new(graph);

    while let Some(path) = residual.augmenting_path(source, sink) {
        let bottleneck = residual.bottleneck(&path);
        residual.augment(&path, bottleneck);

        let mut nodes: Vec<NodeId> = path.iter().map(|&(node, _)| node).collect();
        nodes.push(sink);
        log::trace!("Augmenting path {:?} carries {}", nodes, bottleneck);

        // Parallel edges near 2^63 can push the total past u64::MAX.
        result.value = result.value.saturating_add(bottleneck);
        result.augmentations.push(Augmentation { path: nodes, bottleneck });
    }

    log::debug!(
        "Max flow {} -> {} = {} after {} augmentations",
        source,
        sink,
        result.value,
        result.augmentations.len()
    );

    result
}

/// Maximum flow value from `source` to `sink`.
pub fn max_flow(graph: &GraphStore, source: NodeId, sink: NodeId) -> u64 {
    ford_fulkerson(graph, source, sink).value
}

pub struct MaxFlow;

impl GraphAlgorithm for MaxFlow {
    fn execute(&self, graph: &GraphStore, params: &AlgorithmParams) -> Result<RecordBatch> {
        let source = params.node("source")?;
        let sink = params.node("sink")?;

        let result = ford_fulkerson(graph, source, sink);

        let schema = Arc::new(Schema::new(vec![
            Field::new("source", DataType::UInt32, false),
            Field::new("sink", DataType::UInt32, false),
            Field::new("bottleneck", DataType::UInt64, false),
            Field::new("path", DataType::List(
                Arc::new(Field::new("item", DataType::UInt32, true))
            ), false),
        ]));

        let mut list_builder = ListBuilder::new(UInt32Builder::new());
        for augmentation in &result.augmentations {
            for node in &augmentation.path {
                list_builder.values().append_value(*node);
            }
            list_builder.append(true);
        }

        let rows = result.augmentations.len();
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(UInt32Array::from(vec![source; rows])),
                Arc::new(UInt32Array::from(vec![sink; rows])),
                Arc::new(UInt64Array::from_iter_values(
                    result.augmentations.iter().map(|a| a.bottleneck),
                )),
                Arc::new(list_builder.finish()),
            ],
        ).map_err(GraphError::from)
    }

    fn name(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> &'static str {
        "Maximum flow between two nodes using Ford-Fulkerson with DFS augmenting paths"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_flow_uses_direct_edge_and_detour() {
        let graph = GraphStore::from_triples([(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let result = ford_fulkerson(&graph, 0, 2);

        assert_eq!(result.value, 2);
        assert_eq!(result.augmentations.len(), 2);
        assert_eq!(result.augmentations[0].path, vec![0, 1, 2]);
        assert_eq!(result.augmentations[1].path, vec![0, 2]);
    }

    #[test]
    fn test_no_path_means_zero_flow() {
        let graph = GraphStore::from_triples([(0, 1, 5), (2, 1, 5)]);
        assert_eq!(max_flow(&graph, 0, 2), 0);
        assert_eq!(max_flow(&graph, 0, 9), 0);
    }

    #[test]
    fn test_zero_capacity_edges_block_flow() {
        let graph = GraphStore::from_triples([(0, 1, 0), (1, 2, 7)]);
        assert_eq!(max_flow(&graph, 0, 2), 0);
    }

    #[test]
    fn test_source_equals_sink() {
        let graph = GraphStore::from_triples([(0, 1, 3), (1, 0, 3)]);
        assert_eq!(max_flow(&graph, 0, 0), 0);
    }

    #[test]
    fn test_reverse_edges_cancel_flow() {
        // Classic case where the first DFS path 0-1-2-3 must be partly undone
        // through the residual edge 2 -> 1.
        let graph = GraphStore::from_triples([
            (0, 1, 1),
            (0, 2, 1),
            (1, 2, 1),
            (1, 3, 1),
            (2, 3, 1),
        ]);
        let result = ford_fulkerson(&graph, 0, 3);

        assert_eq!(result.value, 2);
        assert_eq!(result.augmentations[0].path, vec![0, 1, 2, 3]);
        assert_eq!(result.augmentations[1].path, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_parallel_edges_add_capacity() {
        let graph = GraphStore::from_triples([(0, 1, 0), (0, 1, 2), (0, 1, -3)]);
        assert_eq!(max_flow(&graph, 0, 1), 5);
    }

    #[test]
    fn test_flow_does_not_touch_source_graph() {
        let graph = GraphStore::from_triples([(0, 1, 4), (1, 2, 3)]);
        let before = graph.edges().to_vec();

        assert_eq!(max_flow(&graph, 0, 2), 3);
        assert_eq!(graph.edges(), before.as_slice());
    }

    #[test]
    fn test_max_flow_execute_lists_augmentations() {
        let graph = GraphStore::from_triples([(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let params = AlgorithmParams::new().with_param("source", 0).with_param("sink", 2);
        let batch = MaxFlow.execute(&graph, &params).unwrap();
        assert_eq!(batch.num_rows(), 2);
    }

    #[test]
    fn test_flow_value_saturates_on_extreme_parallel_capacities() {
        let graph = GraphStore::from_triples([(0, 1, i64::MIN), (0, 1, i64::MIN)]);
        let result = ford_fulkerson(&graph, 0, 1);

        assert_eq!(result.augmentations.len(), 2);
        assert!(result.augmentations.iter().all(|a| a.bottleneck == 1 << 63));
        assert_eq!(result.value, u64::MAX);
    }

    #[test]
    fn test_extreme_capacities_along_a_chain() {
        let graph = GraphStore::from_triples([(0, 1, i64::MAX), (1, 2, i64::MIN), (2, 1, i64::MIN)]);
        assert_eq!(max_flow(&graph, 0, 2), i64::MAX as u64);
    }
}
