//! Plain-text rendering of algorithm results for the command line.

use std::fmt::Write;
use crate::algorithms::flow::MaxFlowResult;
use crate::algorithms::pathfinding::{Distance, DistanceTable};
use crate::algorithms::spanning_tree::total_weight;
use crate::graph::{Edge, NodeId};

/// Default number of nodes shown in a centrality ranking.
pub const DEFAULT_TOP_K: usize = 5;

pub fn traversal(label: &str, start: NodeId, order: &[NodeId]) -> String {
    let nodes: Vec<String> = order.iter().map(|n| n.to_string()).collect();
    format!("{} traversal from node {}:\n{}\n", label, start, nodes.join(" "))
}

pub fn distance(source: NodeId, dest: NodeId, distance: Distance) -> String {
    match distance.value() {
        Some(d) => format!("Shortest distance from node {} to node {} is: {}\n", source, dest, d),
        None => format!("No path exists from node {} to node {}\n", source, dest),
    }
}

/// Tab-separated matrix with a header row of node ids; `INF` marks no path.
pub fn distance_table(table: &DistanceTable) -> String {
    let mut out = String::from("Shortest Paths Matrix:\n");
    let ids = table.index().ids();

    out.push('\t');
    let header: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    out.push_str(&header.join("\t"));
    out.push('\n');

    for (id, row) in ids.iter().zip(table.rows()) {
        let cells: Vec<String> = row.iter().map(|d| d.to_string()).collect();
        let _ = writeln!(out, "{}\t{}", id, cells.join("\t"));
    }

    out
}

pub fn spanning_tree(label: &str, tree: &[Edge]) -> String {
    let mut out = format!("{}:\n", label);
    for edge in tree {
        let _ = writeln!(out, "{} -> {}, Weight: {}", edge.from, edge.to, edge.magnitude());
    }
    let _ = writeln!(out, "\nNumber of edges: {}", tree.len());
    let _ = writeln!(out, "Total weight: {}", total_weight(tree));
    out
}

pub fn max_flow(result: &MaxFlowResult) -> String {
    format!(
        "Maximum Flow from node {} to node {}: {}\n",
        result.source, result.sink, result.value
    )
}

pub fn centrality(measure: &str, ranked: &[(NodeId, f64)]) -> String {
    let mut out = format!("Top {} Nodes with Highest {} Centrality:\n", ranked.len(), measure);
    for (node, score) in ranked {
        let _ = writeln!(out, "Node {}: {}", node, score);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::pathfinding::all_shortest_paths;
    use crate::graph::GraphStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_distance_table_marks_unreachable() {
        let graph = GraphStore::from_triples([(0, 1, 1), (1, 2, 1), (0, 2, 5)]);
        let rendered = distance_table(&all_shortest_paths(&graph));

        assert_eq!(
            rendered,
            "Shortest Paths Matrix:\n\t0\t1\t2\n0\t0\t1\t2\n1\tINF\t0\t1\n2\tINF\tINF\t0\n"
        );
    }

    #[test]
    fn test_distance_lines() {
        assert_eq!(
            distance(0, 2, Distance::new(2)),
            "Shortest distance from node 0 to node 2 is: 2\n"
        );
        assert_eq!(
            distance(2, 0, Distance::UNREACHABLE),
            "No path exists from node 2 to node 0\n"
        );
    }

    #[test]
    fn test_spanning_tree_summary() {
        let rendered = spanning_tree("Minimum Spanning Tree", &[Edge::new(58, 88, -10)]);
        assert!(rendered.contains("58 -> 88, Weight: 10"));
        assert!(rendered.contains("Number of edges: 1"));
        assert!(rendered.contains("Total weight: 10"));
    }
}
