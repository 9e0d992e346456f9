use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use graph_engine::algorithms;
use graph_engine::prelude::*;
use graph_engine::report;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "graph-engine")]
#[command(about = "Run classical graph algorithms over an edge-list file")]
#[command(version)]
struct Cli {
    /// Edge list: one `from to weight` triple per line, `#` comments allowed
    #[arg(short, long, global = true, default_value = "reachability.txt")]
    input: PathBuf,

    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    Bfs {
        #[arg(short, long, default_value_t = 0)]
        start: NodeId,
    },
    Dfs {
        #[arg(short, long, default_value_t = 0)]
        start: NodeId,
    },
    ShortestPath {
        #[arg(short, long, default_value_t = 0)]
        source: NodeId,
        #[arg(short, long, default_value_t = 2)]
        target: NodeId,
    },
    AllPairs,
    Kruskal,
    Prim {
        #[arg(short, long, default_value_t = 0)]
        start: NodeId,
    },
    MaxFlow {
        #[arg(short, long, default_value_t = 0)]
        source: NodeId,
        #[arg(short = 't', long, default_value_t = 2)]
        sink: NodeId,
    },
    Betweenness {
        #[arg(short, long, default_value_t = report::DEFAULT_TOP_K)]
        top: usize,
    },
    /// Run a registered algorithm with JSON parameters and print its table
    Run {
        algorithm: String,
        #[arg(short, long, default_value = "{}")]
        params: String,
    },
}

fn emit<T: Serialize>(format: Format, value: &T, text: String) -> anyhow::Result<()> {
    match format {
        Format::Text => print!("{}", text),
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let graph = load(&cli.input)
        .with_context(|| format!("failed to load graph from {}", cli.input.display()))?;

    log::info!(
        "Graph has {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    match cli.command {
        Commands::Bfs { start } => {
            let order = bfs(&graph, start);
            emit(cli.format, &order, report::traversal("BFS", start, &order))?;
        }
        Commands::Dfs { start } => {
            let order = dfs(&graph, start);
            emit(cli.format, &order, report::traversal("DFS", start, &order))?;
        }
        Commands::ShortestPath { source, target } => {
            let path = shortest_path(&graph, source, target);
            let distance = path.as_ref().map(|p| p.distance).unwrap_or(Distance::UNREACHABLE);
            emit(cli.format, &path, report::distance(source, target, distance))?;
        }
        Commands::AllPairs => {
            let table = all_shortest_paths(&graph);
            emit(cli.format, &table, report::distance_table(&table))?;
        }
        Commands::Kruskal => {
            let tree = kruskal(&graph);
            emit(cli.format, &tree, report::spanning_tree("Minimum Spanning Tree", &tree))?;
        }
        Commands::Prim { start } => {
            let tree = prim_from(&graph, start);
            emit(cli.format, &tree, report::spanning_tree("Minimum Spanning Tree (MST) edges", &tree))?;
        }
        Commands::MaxFlow { source, sink } => {
            let result = ford_fulkerson(&graph, source, sink);
            emit(cli.format, &result, report::max_flow(&result))?;
        }
        Commands::Betweenness { top } => {
            let ranked = top_k(&betweenness(&graph), top);
            emit(cli.format, &ranked, report::centrality("Betweenness", &ranked))?;
        }
        Commands::Run { algorithm, params } => {
            let algorithm = algorithms::lookup(&algorithm)
                .ok_or_else(|| GraphError::invalid_parameter(format!("unknown algorithm '{}'", algorithm)))?;
            let params = AlgorithmParams::from_json(&params).context("params must be a JSON object")?;

            log::debug!("Running {}: {}", algorithm.name(), algorithm.description());
            let batch = algorithm.execute(&graph, &params)?;
            println!("{}", arrow::util::pretty::pretty_format_batches(&[batch])?);
        }
    }

    Ok(())
}
