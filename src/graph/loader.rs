//! Edge-list text loader.
//!
//! One directed edge per line as `from to weight`, whitespace separated.
//! Lines starting with `#` and blank lines are skipped; columns past the
//! third are ignored. Weights are stored with their sign, normalization is
//! left to [`crate::graph::weight`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use crate::error::{GraphError, Result};
use crate::graph::GraphStore;

/// Load a graph from an edge-list file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<GraphStore> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let graph = parse(BufReader::new(file))?;

    log::debug!(
        "Loaded {} edges over {} nodes from {}",
        graph.edge_count(),
        graph.node_count(),
        path.display()
    );

    Ok(graph)
}

/// Parse an edge list from any buffered reader.
pub fn parse<R: BufRead>(reader: R) -> Result<GraphStore> {
    let mut graph = GraphStore::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            log::trace!("Skipping line {}", line_no);
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let from = parse_field(fields.next(), "from node id", line_no)?;
        let to = parse_field(fields.next(), "to node id", line_no)?;
        let weight = parse_field(fields.next(), "weight", line_no)?;

        let extra = fields.count();
        if extra > 0 {
            log::warn!("Ignoring {} extra column(s) on line {}", extra, line_no);
        }

        graph.add_edge(from, to, weight);
    }

    Ok(graph)
}

fn parse_field<T>(field: Option<&str>, name: &str, line: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field.ok_or_else(|| GraphError::parse(line, format!("missing {}", name)))?;
    raw.parse::<T>()
        .map_err(|e| GraphError::parse(line, format!("invalid {} '{}': {}", name, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let input = "# FromNodeID ToNodeID Weight\n\n0 1 5\n   \n1\t2\t-3\n";
        let graph = parse(Cursor::new(input)).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_count(), 3);

        let edge = graph.adjacent(1).next().unwrap();
        assert_eq!(edge.weight, -3);
        assert_eq!(edge.magnitude(), 3);
    }

    #[test]
    fn test_parse_ignores_extra_columns() {
        let input = "0 1 5 label\n1 2 -3 x y\n";
        let graph = parse(Cursor::new(input)).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.adjacent(1).next().unwrap().weight, -3);
    }

    #[test]
    fn test_parse_reports_line_of_bad_row() {
        let input = "0 1 5\n1 two 3\n";
        match parse(Cursor::new(input)) {
            Err(GraphError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("to node id"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_truncated_row() {
        let result = parse(Cursor::new("0 1\n"));
        assert!(matches!(result, Err(GraphError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_parse_rejects_negative_node_id() {
        let result = parse(Cursor::new("-1 1 4\n"));
        assert!(matches!(result, Err(GraphError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# reachability sample").unwrap();
        writeln!(file, "27 0 -757").unwrap();
        writeln!(file, "0 27 12").unwrap();

        let graph = load(file.path()).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_node(27));
        assert_eq!(graph.adjacent(27).next().unwrap().magnitude(), 757);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(GraphError::Io(_))));
    }
}
