use arrow::array::builder::{ListBuilder, UInt32Builder};
use arrow::array::{UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use hashbrown::{HashMap, HashSet};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;
use crate::algorithms::{AlgorithmParams, GraphAlgorithm};
use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, Magnitude, NodeId, NodeIndex};

/// A path length, or the reserved "no path" value.
///
/// The sentinel is an ordinary value that compares above every real
/// distance. Arithmetic goes through [`Distance::extend`], which keeps the
/// sentinel absorbing instead of wrapping. Serializes as the finite value,
/// or `null` for the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(u64);

impl Distance {
    pub const ZERO: Distance = Distance(0);
    pub const UNREACHABLE: Distance = Distance(u64::MAX);

    pub fn new(value: u64) -> Self {
        Distance(value)
    }

    pub fn is_reachable(self) -> bool {
        self != Self::UNREACHABLE
    }

    /// The finite value, or `None` for the sentinel.
    pub fn value(self) -> Option<u64> {
        self.is_reachable().then_some(self.0)
    }

    /// Length of this path extended by one more edge or sub-path.
    pub fn extend(self, by: Magnitude) -> Distance {
        if !self.is_reachable() {
            return Self::UNREACHABLE;
        }
        // Saturating keeps a huge finite sum from aliasing a short one.
        Distance(self.0.saturating_add(by).min(u64::MAX - 1))
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(d) => write!(f, "{}", d),
            None => write!(f, "INF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DijkstraNode {
    node_id: NodeId,
    distance: Distance,
}

impl Ord for DijkstraNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other.distance.cmp(&self.distance)
            .then_with(|| other.node_id.cmp(&self.node_id))
    }
}

impl PartialOrd for DijkstraNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tentative distances plus the predecessor that produced each of them.
struct Relaxation {
    distances: HashMap<NodeId, Distance>,
    previous: HashMap<NodeId, NodeId>,
    reached: Option<Distance>,
}

/// Dijkstra from `source`, stopping as soon as `target` is settled.
fn dijkstra(graph: &GraphStore, source: NodeId, target: NodeId) -> Relaxation {
    let mut distances: HashMap<NodeId, Distance> = graph
        .node_ids()
        .map(|node| (node, Distance::UNREACHABLE))
        .collect();
    let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut heap = BinaryHeap::new();

    distances.insert(source, Distance::ZERO);
    heap.push(DijkstraNode {
        node_id: source,
        distance: Distance::ZERO,
    });

    while let Some(current) = heap.pop() {
        // First extraction is authoritative; later ones are stale.
        if !settled.insert(current.node_id) {
            continue;
        }

        if current.node_id == target {
            return Relaxation {
                distances,
                previous,
                reached: Some(current.distance),
            };
        }

        for edge in graph.adjacent(current.node_id) {
            let new_distance = current.distance.extend(edge.magnitude());
            let known = distances.get(&edge.to).copied().unwrap_or(Distance::UNREACHABLE);

            if new_distance < known {
                distances.insert(edge.to, new_distance);
                previous.insert(edge.to, current.node_id);
                heap.push(DijkstraNode {
                    node_id: edge.to,
                    distance: new_distance,
                });
            }
        }
    }

    Relaxation {
        distances,
        previous,
        reached: None,
    }
}

/// Shortest distance from `source` to `dest` over edge magnitudes, or
/// [`Distance::UNREACHABLE`] when no path exists.
pub fn shortest_distance(graph: &GraphStore, source: NodeId, dest: NodeId) -> Distance {
    dijkstra(graph, source, dest)
        .reached
        .unwrap_or(Distance::UNREACHABLE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    pub distance: Distance,
    pub path: Vec<NodeId>,
}

/// Shortest distance plus the node sequence that realizes it.
pub fn shortest_path(graph: &GraphStore, source: NodeId, dest: NodeId) -> Option<PathResult> {
    let relaxation = dijkstra(graph, source, dest);
    let distance = relaxation.reached?;

    log::trace!(
        "Settled {} of {} tentative distances before reaching {}",
        relaxation.distances.values().filter(|d| d.is_reachable()).count(),
        relaxation.distances.len(),
        dest
    );

    Some(PathResult {
        distance,
        path: reconstruct_path(dest, &relaxation.previous),
    })
}

fn reconstruct_path(target: NodeId, previous: &HashMap<NodeId, NodeId>) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = target;

    while let Some(&prev) = previous.get(&current) {
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

/// Dense all-pairs distance table over a compacted node index.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceTable {
    index: NodeIndex,
    distances: Vec<Vec<Distance>>,
}

impl DistanceTable {
    /// Id-to-row mapping; row and column `i` both belong to `index().node(i)`.
    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Distance by node id; unknown ids are unreachable.
    pub fn distance(&self, from: NodeId, to: NodeId) -> Distance {
        match (self.index.position(from), self.index.position(to)) {
            (Some(i), Some(j)) => self.distances[i][j],
            _ => Distance::UNREACHABLE,
        }
    }

    /// Rows in index order.
    pub fn rows(&self) -> &[Vec<Distance>] {
        &self.distances
    }
}

/// Direct-edge table: zero diagonal, last parallel edge wins, self loops
/// never overwrite the diagonal.
pub fn direct_distances(graph: &GraphStore) -> DistanceTable {
    let index = NodeIndex::new(graph);
    let n = index.len();
    let mut distances = vec![vec![Distance::UNREACHABLE; n]; n];

    for (i, row) in distances.iter_mut().enumerate() {
        row[i] = Distance::ZERO;
    }

    for edge in graph.edges() {
        if edge.from == edge.to {
            continue;
        }
        if let (Some(i), Some(j)) = (index.position(edge.from), index.position(edge.to)) {
            distances[i][j] = Distance::new(edge.magnitude());
        }
    }

    DistanceTable { index, distances }
}

/// Floyd-Warshall over every known node.
pub fn all_shortest_paths(graph: &GraphStore) -> DistanceTable {
    let mut table = direct_distances(graph);
    let n = table.len();
    let dist = &mut table.distances;

    for k in 0..n {
        for i in 0..n {
            let via = dist[i][k];
            if !via.is_reachable() {
                continue;
            }
            for j in 0..n {
                let tail = dist[k][j];
                if let Some(tail) = tail.value() {
                    let candidate = via.extend(tail);
                    if candidate < dist[i][j] {
                        dist[i][j] = candidate;
                    }
                }
            }
        }
    }

    log::debug!("Computed all-pairs distances for {} nodes", n);
    table
}

pub struct ShortestPath;

impl GraphAlgorithm for ShortestPath {
    fn execute(&self, graph: &GraphStore, params: &AlgorithmParams) -> Result<RecordBatch> {
        let source = params.node("source")?;
        let target = params.node("target")?;

        if !graph.has_node(target) {
            return Err(GraphError::node_not_found(target));
        }

        let result = shortest_path(graph, source, target)
            .ok_or_else(|| GraphError::algorithm("No path found between source and target"))?;

        let schema = Arc::new(Schema::new(vec![
            Field::new("source", DataType::UInt32, false),
            Field::new("target", DataType::UInt32, false),
            Field::new("distance", DataType::UInt64, false),
            Field::new("path", DataType::List(
                Arc::new(Field::new("item", DataType::UInt32, true))
            ), false),
        ]));

        let mut list_builder = ListBuilder::new(UInt32Builder::new());
        for node in &result.path {
            list_builder.values().append_value(*node);
        }
        list_builder.append(true);

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(UInt32Array::from(vec![source])),
                Arc::new(UInt32Array::from(vec![target])),
                Arc::new(UInt64Array::from(vec![result.distance.value().unwrap_or(u64::MAX)])),
                Arc::new(list_builder.finish()),
            ],
        ).map_err(GraphError::from)
    }

    fn name(&self) -> &'static str {
        "shortest_path"
    }

    fn description(&self) -> &'static str {
        "Find the shortest path between two nodes using Dijkstra's algorithm"
    }
}

pub struct AllPairsShortestPaths;

impl GraphAlgorithm for AllPairsShortestPaths {
    fn execute(&self, graph: &GraphStore, _params: &AlgorithmParams) -> Result<RecordBatch> {
        let table = all_shortest_paths(graph);
        let ids = table.index().ids();

        let mut sources = Vec::new();
        let mut targets = Vec::new();
        let mut distances = Vec::new();

        // Unreachable pairs are left out of the result.
        for (i, row) in table.rows().iter().enumerate() {
            for (j, d) in row.iter().enumerate() {
                if let Some(d) = d.value() {
                    sources.push(ids[i]);
                    targets.push(ids[j]);
                    distances.push(d);
                }
            }
        }

        let schema = Arc::new(Schema::new(vec![
            Field::new("source", DataType::UInt32, false),
            Field::new("target", DataType::UInt32, false),
            Field::new("distance", DataType::UInt64, false),
        ]));

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(UInt32Array::from(sources)),
                Arc::new(UInt32Array::from(targets)),
                Arc::new(UInt64Array::from(distances)),
            ],
        ).map_err(GraphError::from)
    }

    fn name(&self) -> &'static str {
        "all_pairs_shortest_paths"
    }

    fn description(&self) -> &'static str {
        "Distances between every pair of nodes using Floyd-Warshall"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, ListArray};

    fn detour_graph() -> GraphStore {
        GraphStore::from_triples([(0, 1, 1), (1, 2, 1), (0, 2, 5)])
    }

    #[test]
    fn test_shortest_distance_takes_detour() {
        assert_eq!(shortest_distance(&detour_graph(), 0, 2), Distance::new(2));
    }

    #[test]
    fn test_shortest_distance_to_self_is_zero() {
        let graph = detour_graph();
        for node in graph.node_ids() {
            assert_eq!(shortest_distance(&graph, node, node), Distance::ZERO);
        }
    }

    #[test]
    fn test_unreachable_destination_is_sentinel() {
        let graph = detour_graph();
        let d = shortest_distance(&graph, 2, 0);
        assert_eq!(d, Distance::UNREACHABLE);
        assert!(!d.is_reachable());
        assert_eq!(d.value(), None);
        assert_eq!(d.to_string(), "INF");
    }

    #[test]
    fn test_negative_weights_use_magnitude() {
        let graph = GraphStore::from_triples([(0, 1, -4), (1, 2, -1), (0, 2, 3)]);
        assert_eq!(shortest_distance(&graph, 0, 2), Distance::new(3));
    }

    #[test]
    fn test_shortest_path_reconstruction() {
        let result = shortest_path(&detour_graph(), 0, 2).unwrap();
        assert_eq!(result.path, vec![0, 1, 2]);
        assert_eq!(result.distance, Distance::new(2));

        assert!(shortest_path(&detour_graph(), 2, 0).is_none());
    }

    #[test]
    fn test_extend_keeps_sentinel_absorbing() {
        assert_eq!(Distance::UNREACHABLE.extend(1), Distance::UNREACHABLE);
        assert!(Distance::new(u64::MAX - 1).extend(10).is_reachable());
    }

    #[test]
    fn test_all_pairs_detour() {
        let table = all_shortest_paths(&detour_graph());
        assert_eq!(table.distance(0, 2), Distance::new(2));
        assert_eq!(table.distance(2, 0), Distance::UNREACHABLE);
        for i in 0..table.len() {
            assert_eq!(table.rows()[i][i], Distance::ZERO);
        }
    }

    #[test]
    fn test_all_pairs_sparse_ids() {
        let graph = GraphStore::from_triples([(0, 5, 2), (5, 100, 3)]);
        let table = all_shortest_paths(&graph);

        assert_eq!(table.len(), 3);
        assert_eq!(table.distance(0, 100), Distance::new(5));
        assert_eq!(table.index().position(100), Some(2));
    }

    #[test]
    fn test_direct_distances_last_parallel_edge_wins() {
        let graph = GraphStore::from_triples([(0, 1, 2), (0, 1, 9), (1, 1, 4)]);
        let direct = direct_distances(&graph);
        assert_eq!(direct.distance(0, 1), Distance::new(9));
        assert_eq!(direct.distance(1, 1), Distance::ZERO);
    }

    #[test]
    fn test_shortest_path_execute() {
        let params = AlgorithmParams::new()
            .with_param("source", 0)
            .with_param("target", 2);
        let batch = ShortestPath.execute(&detour_graph(), &params).unwrap();

        assert_eq!(batch.num_rows(), 1);
        let distance = batch.column(2).as_any().downcast_ref::<UInt64Array>().unwrap();
        assert_eq!(distance.value(0), 2);

        let path = batch.column(3).as_any().downcast_ref::<ListArray>().unwrap();
        let nodes = path.value(0);
        let nodes = nodes.as_any().downcast_ref::<UInt32Array>().unwrap();
        assert_eq!(nodes.values().to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_shortest_path_execute_errors() {
        let graph = detour_graph();
        let no_path = AlgorithmParams::new().with_param("source", 2).with_param("target", 0);
        assert!(matches!(
            ShortestPath.execute(&graph, &no_path),
            Err(GraphError::Algorithm(_))
        ));

        let unknown = AlgorithmParams::new().with_param("source", 0).with_param("target", 7);
        assert!(matches!(
            ShortestPath.execute(&graph, &unknown),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_all_pairs_execute_skips_unreachable_pairs() {
        let batch = AllPairsShortestPaths
            .execute(&detour_graph(), &AlgorithmParams::new())
            .unwrap();
        // 3 diagonal entries + (0,1), (0,2), (1,2)
        assert_eq!(batch.num_rows(), 6);
    }

    #[test]
    fn test_extreme_weights_never_produce_the_sentinel() {
        let graph = GraphStore::from_triples([(0, 1, i64::MIN), (1, 2, i64::MAX), (2, 3, i64::MIN)]);

        assert_eq!(shortest_distance(&graph, 0, 1), Distance::new(1 << 63));
        let far = shortest_distance(&graph, 0, 3);
        assert!(far.is_reachable());
        assert_eq!(far, Distance::new(u64::MAX - 1));

        let table = all_shortest_paths(&graph);
        assert_eq!(table.distance(0, 3), far);
        assert_eq!(table.distance(1, 2), Distance::new(i64::MAX as u64));
        assert!(!table.distance(3, 0).is_reachable());
    }

    #[test]
    fn test_distance_serializes_sentinel_as_null() {
        assert_eq!(serde_json::to_string(&Distance::new(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&Distance::UNREACHABLE).unwrap(), "null");

        let json = serde_json::to_value(all_shortest_paths(&detour_graph())).unwrap();
        assert_eq!(json["distances"][2], serde_json::json!([null, null, 0]));
        assert_eq!(json["distances"][0], serde_json::json!([0, 1, 2]));
    }
}
