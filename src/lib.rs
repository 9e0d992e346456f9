pub mod graph;
pub mod algorithms;
pub mod error;
pub mod report;

pub use graph::{Edge, GraphStore, NodeId, NodeIndex};
pub use graph::loader::{load, parse};
pub use algorithms::{GraphAlgorithm, AlgorithmParams};
pub use algorithms::traversal::{bfs, dfs, Bfs, Dfs};
pub use algorithms::pathfinding::{
    all_shortest_paths, shortest_distance, shortest_path, AllPairsShortestPaths, Distance,
    DistanceTable, PathResult, ShortestPath,
};
pub use algorithms::spanning_tree::{kruskal, prim, prim_from, total_weight, KruskalMst, PrimMst};
pub use algorithms::flow::{ford_fulkerson, max_flow, Augmentation, MaxFlow, MaxFlowResult};
pub use algorithms::centrality::{betweenness, top_k, BetweennessCentrality};
pub use error::{GraphError, Result};

pub mod prelude {
    pub use crate::graph::{Edge, GraphStore, NodeId, NodeIndex};
    pub use crate::graph::loader::{load, parse};
    pub use crate::algorithms::{GraphAlgorithm, AlgorithmParams};
    pub use crate::algorithms::traversal::{bfs, dfs, Bfs, Dfs};
    pub use crate::algorithms::pathfinding::{
        all_shortest_paths, shortest_distance, shortest_path, AllPairsShortestPaths, Distance,
        DistanceTable, PathResult, ShortestPath,
    };
    pub use crate::algorithms::spanning_tree::{kruskal, prim, prim_from, total_weight, KruskalMst, PrimMst};
    pub use crate::algorithms::flow::{ford_fulkerson, max_flow, Augmentation, MaxFlow, MaxFlowResult};
    pub use crate::algorithms::centrality::{betweenness, top_k, BetweennessCentrality};
    pub use crate::error::{GraphError, Result};
}
