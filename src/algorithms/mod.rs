pub mod traits;
pub mod traversal;
pub mod pathfinding;
pub mod spanning_tree;
pub mod flow;
pub mod centrality;

pub use traits::{GraphAlgorithm, AlgorithmParams};

/// Every tabular algorithm, looked up by [`GraphAlgorithm::name`].
pub fn registry() -> Vec<Box<dyn GraphAlgorithm>> {
    vec![
        Box::new(traversal::Bfs),
        Box::new(traversal::Dfs),
        Box::new(pathfinding::ShortestPath),
        Box::new(pathfinding::AllPairsShortestPaths),
        Box::new(spanning_tree::KruskalMst),
        Box::new(spanning_tree::PrimMst),
        Box::new(flow::MaxFlow),
        Box::new(centrality::BetweennessCentrality),
    ]
}

/// Find a registered algorithm by name.
pub fn lookup(name: &str) -> Option<Box<dyn GraphAlgorithm>> {
    registry().into_iter().find(|algorithm| algorithm.name() == name)
}
