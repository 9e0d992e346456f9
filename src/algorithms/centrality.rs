use arrow::array::{Float64Array, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use hashbrown::HashMap;
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::sync::Arc;
use crate::algorithms::{AlgorithmParams, GraphAlgorithm};
use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, NodeId};

/// Raw betweenness centrality by Brandes' algorithm over hop distance.
///
/// Every known node is used as a source once. Scores are the plain
/// accumulated dependencies, keyed in the graph's node order and not
/// divided by `(N-1)(N-2)`.
pub fn betweenness(graph: &GraphStore) -> IndexMap<NodeId, f64> {
    let mut centrality: IndexMap<NodeId, f64> = graph.node_ids().map(|n| (n, 0.0)).collect();

    for source in graph.node_ids() {
        let mut stack: Vec<NodeId> = Vec::new();
        let mut predecessors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut num_paths: HashMap<NodeId, f64> = HashMap::new();
        let mut distances: HashMap<NodeId, u32> = HashMap::new();
        let mut delta: HashMap<NodeId, f64> = HashMap::new();

        num_paths.insert(source, 1.0);
        distances.insert(source, 0);

        // BFS
        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            stack.push(current);
            let current_dist = distances[&current];
            let current_paths = num_paths[&current];

            for edge in graph.adjacent(current) {
                let neighbor = edge.to;

                // First time we reach this neighbor
                let neighbor_dist = *distances.entry(neighbor).or_insert_with(|| {
                    queue.push_back(neighbor);
                    current_dist + 1
                });

                // Shortest path to neighbor via current
                if neighbor_dist == current_dist + 1 {
                    *num_paths.entry(neighbor).or_insert(0.0) += current_paths;
                    predecessors.entry(neighbor).or_default().push(current);
                }
            }
        }

        // Accumulation, farthest nodes first
        while let Some(w) = stack.pop() {
            let w_delta = delta.get(&w).copied().unwrap_or(0.0);
            let w_paths = num_paths[&w];

            if let Some(preds) = predecessors.get(&w) {
                for predecessor in preds {
                    let contribution = (num_paths[predecessor] / w_paths) * (1.0 + w_delta);
                    *delta.entry(*predecessor).or_insert(0.0) += contribution;
                }
            }

            if w != source {
                if let Some(score) = centrality.get_mut(&w) {
                    *score += w_delta;
                }
            }
        }
    }

    log::debug!("Computed betweenness for {} nodes", centrality.len());
    centrality
}

/// The `k` highest scores, descending; equal scores keep node order.
pub fn top_k(scores: &IndexMap<NodeId, f64>, k: usize) -> Vec<(NodeId, f64)> {
    let mut sorted: Vec<(NodeId, f64)> = scores.iter().map(|(&n, &s)| (n, s)).collect();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    sorted.truncate(k);
    sorted
}

pub struct BetweennessCentrality;

impl GraphAlgorithm for BetweennessCentrality {
    fn execute(&self, graph: &GraphStore, params: &AlgorithmParams) -> Result<RecordBatch> {
        let centrality = betweenness(graph);
        let limit: usize = params.get("limit").unwrap_or(centrality.len());

        // Sort by centrality score (descending)
        let sorted = top_k(&centrality, limit);

        let schema = Arc::new(Schema::new(vec![
            Field::new("node_id", DataType::UInt32, false),
            Field::new("betweenness_centrality", DataType::Float64, false),
        ]));

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(UInt32Array::from_iter_values(sorted.iter().map(|(n, _)| *n))),
                Arc::new(Float64Array::from_iter_values(sorted.iter().map(|(_, s)| *s))),
            ],
        ).map_err(GraphError::from)
    }

    fn name(&self) -> &'static str {
        "betweenness_centrality"
    }

    fn description(&self) -> &'static str {
        "Calculate betweenness centrality using Brandes' algorithm"
    }
}
