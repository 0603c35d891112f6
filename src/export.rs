//! Table export (CSV and JSON)
//!
//! Column names match [`NodeMetricsRow`] and [`EdgeMetricsRow`] exactly.
//! Node identities are written in their `field::value` text form.

use crate::error::CographResult;
use crate::metrics::{EdgeMetricsRow, MetricsTables, NodeMetricsRow};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const NODE_COLUMNS: [&str; 9] = [
    "node_id",
    "label",
    "source_field",
    "degree",
    "degree_weighted",
    "degree_centrality",
    "betweenness",
    "eigenvector",
    "community",
];

pub const EDGE_COLUMNS: [&str; 3] = ["u", "v", "weight"];

pub const NODES_FILE: &str = "nodes_metrics.csv";
pub const EDGES_FILE: &str = "edges_metrics.csv";

/// Quote a CSV field when it contains a comma, quote or line break
pub fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn write_nodes_csv<W: Write>(rows: &[NodeMetricsRow], mut out: W) -> CographResult<()> {
    writeln!(out, "{}", NODE_COLUMNS.join(","))?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            csv_field(&row.node_id.to_string()),
            csv_field(&row.label),
            csv_field(&row.source_field),
            row.degree,
            row.degree_weighted,
            row.degree_centrality,
            row.betweenness,
            row.eigenvector,
            row.community
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_edges_csv<W: Write>(rows: &[EdgeMetricsRow], mut out: W) -> CographResult<()> {
    writeln!(out, "{}", EDGE_COLUMNS.join(","))?;
    for row in rows {
        writeln!(
            out,
            "{},{},{}",
            csv_field(&row.u.to_string()),
            csv_field(&row.v.to_string()),
            row.weight
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write both tables into `dir` (created if needed). Returns the two paths.
pub fn write_tables(tables: &MetricsTables, dir: impl AsRef<Path>) -> CographResult<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let nodes_path = dir.join(NODES_FILE);
    let edges_path = dir.join(EDGES_FILE);
    write_nodes_csv(&tables.nodes, BufWriter::new(File::create(&nodes_path)?))?;
    write_edges_csv(&tables.edges, BufWriter::new(File::create(&edges_path)?))?;

    info!(
        nodes = %nodes_path.display(),
        edges = %edges_path.display(),
        "wrote metrics tables"
    );
    Ok((nodes_path, edges_path))
}

pub fn to_json(tables: &MetricsTables) -> CographResult<String> {
    Ok(serde_json::to_string_pretty(tables)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeIdentity;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_edges_csv() {
        let rows = vec![EdgeMetricsRow {
            u: NodeIdentity::new("A", "x"),
            v: NodeIdentity::new("B", "p,q"),
            weight: 3,
        }];
        let mut buf = Vec::new();
        write_edges_csv(&rows, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "u,v,weight\nA::x,\"B::p,q\",3\n");
    }
}
