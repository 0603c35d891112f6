//! Cograph CLI: build a co-occurrence graph from a table and report its metrics

mod input;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cograph::export::{self, write_nodes_csv};
use cograph::{
    build_graph, community_sizes, compute_metrics, restrict_edges, top_k, BetweennessMode,
    BuildOptions, Dataset, MetricsConfig, MetricsTables, NodeMetric, NodeMetricsRow, PathMetric,
};
use comfy_table::{ContentArrangement, Table};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cograph", version, about = "Co-occurrence graph analysis for tabular data")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph over the selected fields and compute node metrics
    Analyze(AnalyzeArgs),
    /// List columns with their distinct value counts
    Columns {
        /// Dataset file (.json or delimited text)
        dataset: PathBuf,

        /// Field delimiter for text input
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Dataset file (.json or delimited text)
    dataset: PathBuf,

    /// Fields whose values become nodes
    #[arg(long, short, value_delimiter = ',', required = true)]
    fields: Vec<String>,

    /// Field delimiter for text input
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Drop edges seen in fewer rows than this
    #[arg(long, default_value_t = 1)]
    min_weight: u64,

    /// Metrics settings (YAML); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compute betweenness exactly when the graph is small enough
    #[arg(long)]
    exact: bool,

    /// Number of sampled sources for estimated betweenness
    #[arg(long)]
    sample_k: Option<usize>,

    /// Largest graph for which exact betweenness is allowed
    #[arg(long)]
    max_exact: Option<usize>,

    /// Seed for sampling and community detection
    #[arg(long)]
    seed: Option<u64>,

    /// Count hops instead of summing edge weights on shortest paths
    #[arg(long)]
    hops: bool,

    /// Number of nodes to show
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Column used to rank the shown nodes
    #[arg(long, default_value = "degree_weighted")]
    rank_by: NodeMetric,

    /// Write nodes_metrics.csv and edges_metrics.csv into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Analyze(args) => run_analyze(args, cli.format),
        Commands::Columns { dataset, delimiter } => run_columns(dataset, *delimiter, cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log level used when `RUST_LOG` is not set
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn metrics_config(args: &AnalyzeArgs) -> Result<MetricsConfig> {
    let mut config = match &args.config {
        Some(path) => MetricsConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MetricsConfig::default(),
    };

    if args.exact {
        config.approx_betweenness = false;
    }
    if let Some(k) = args.sample_k {
        config.betweenness_sample_k = Some(k);
    }
    if let Some(max) = args.max_exact {
        config.max_nodes_for_exact = max;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.hops {
        config.path_metric = PathMetric::Hops;
    }
    config.validate()?;
    Ok(config)
}

fn run_analyze(args: &AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let config = metrics_config(args)?;
    let dataset = input::load_dataset(&args.dataset, args.delimiter)?;
    info!(
        rows = dataset.row_count(),
        columns = dataset.columns().len(),
        "loaded dataset"
    );

    let graph = build_graph(&dataset, &args.fields, &BuildOptions::with_min_weight(args.min_weight))?;
    let tables = compute_metrics(&graph, &config)?;

    if let Some(dir) = &args.out_dir {
        let (nodes_path, edges_path) = export::write_tables(&tables, dir)?;
        eprintln!("Wrote {} and {}", nodes_path.display(), edges_path.display());
    }

    let top = top_k(&tables.nodes, args.top, args.rank_by);
    match format {
        OutputFormat::Json => {
            let edges = restrict_edges(&tables.edges, &top);
            let report = serde_json::json!({
                "nodes": tables.nodes.len(),
                "edges": tables.edges.len(),
                "total_weight": graph.total_weight(),
                "communities": tables.community_count(),
                "modularity": tables.modularity,
                "provenance": tables.provenance,
                "top_nodes": top,
                "top_edges": edges,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => {
            let rows: Vec<NodeMetricsRow> = top.into_iter().cloned().collect();
            write_nodes_csv(&rows, std::io::stdout().lock())?;
        }
        OutputFormat::Table => {
            print_summary(&tables, graph.total_weight());
            if top.is_empty() {
                println!("(no nodes)");
                return Ok(());
            }
            println!("{}", node_table(&top));
            println!("Top {} of {} node(s) by {}", top.len(), tables.nodes.len(), args.rank_by);
        }
    }

    Ok(())
}

fn print_summary(tables: &MetricsTables, total_weight: u64) {
    let betweenness = match tables.provenance.betweenness {
        BetweennessMode::Trivial => "trivial".to_string(),
        BetweennessMode::Exact => "exact".to_string(),
        BetweennessMode::Sampled { k, seed } => format!("sampled (k={k}, seed={seed})"),
    };

    println!("Nodes:        {}", tables.nodes.len());
    println!("Edges:        {}", tables.edges.len());
    println!("Total weight: {}", total_weight);
    println!("Communities:  {}", tables.community_count());
    println!("Modularity:   {:.4}", tables.modularity);
    println!("Betweenness:  {}", betweenness);
    println!("Eigenvector:  {}", tables.provenance.eigenvector);
    println!("Community:    {}", tables.provenance.community);

    let largest: Vec<String> = community_sizes(&tables.nodes)
        .into_iter()
        .take(5)
        .map(|(community, size)| format!("#{community}: {size}"))
        .collect();
    if !largest.is_empty() {
        println!("Largest:      {}", largest.join(", "));
    }
    println!();
}

fn node_table(rows: &[&NodeMetricsRow]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "field",
        "value",
        "degree",
        "weighted",
        "centrality",
        "betweenness",
        "eigenvector",
        "community",
    ]);

    for row in rows {
        table.add_row(vec![
            row.source_field.clone(),
            row.label.clone(),
            row.degree.to_string(),
            row.degree_weighted.to_string(),
            format!("{:.4}", row.degree_centrality),
            format!("{:.4}", row.betweenness),
            format!("{:.4}", row.eigenvector),
            row.community.to_string(),
        ]);
    }
    table
}

fn run_columns(path: &Path, delimiter: char, format: OutputFormat) -> Result<()> {
    let dataset: Dataset = input::load_dataset(path, delimiter)?;
    let counts = dataset.distinct_counts();

    match format {
        OutputFormat::Json => {
            let columns: Vec<_> = counts
                .iter()
                .map(|(name, distinct)| serde_json::json!({ "column": name, "distinct": distinct }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&columns)?);
        }
        OutputFormat::Csv => {
            println!("column,distinct");
            for (name, distinct) in &counts {
                println!("{},{}", export::csv_field(name), distinct);
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["column", "distinct values"]);
            for (name, distinct) in &counts {
                table.add_row(vec![name.clone(), distinct.to_string()]);
            }
            println!("{}", table);
            println!("{} column(s), {} row(s)", counts.len(), dataset.row_count());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level_shows_summaries() {
        assert_eq!(default_log_level(false), "info");
        assert_eq!(default_log_level(true), "debug");
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.yaml");
        std::fs::write(&path, "seed: 7\nmax_nodes_for_exact: 10\n").unwrap();

        let cli = Cli::parse_from([
            "cograph",
            "analyze",
            "rows.csv",
            "--fields",
            "A,B",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "9",
            "--exact",
        ]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.fields, vec!["A", "B"]);

        let config = metrics_config(&args).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.max_nodes_for_exact, 10);
        assert!(!config.approx_betweenness);
    }
}
