//! Offline bundle export.
//!
//! A bundle is a self-contained `.tar.gz` holding the graph data, an SVG
//! snapshot, a manifest, and an `index.html` that inlines the snapshot so
//! the result opens in any browser without network access. Files are
//! staged in a temporary directory and archived under a single top-level
//! folder named after the topic.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::json;
use tracing::info;

use crate::Result;
use crate::models::GraphData;
use crate::storage::slugify;

/// Write an offline bundle and return its path.
pub fn write_bundle(
    topic: &str,
    graph: &GraphData,
    snapshot_svg: &[u8],
    output: &Path,
) -> Result<PathBuf> {
    let slug = slugify(topic);
    let staging = tempfile::tempdir()?;
    let root = staging.path().join(&slug);
    fs::create_dir_all(&root)?;

    fs::write(root.join("graph.json"), serde_json::to_string_pretty(graph)?)?;
    fs::write(root.join("snapshot.svg"), snapshot_svg)?;

    let manifest = json!({
        "topic": topic,
        "nodes": graph.nodes.len(),
        "edges": graph.edges.len(),
        "generated_at": Utc::now().to_rfc3339(),
    });
    fs::write(
        root.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;

    fs::write(root.join("index.html"), index_html(topic, snapshot_svg))?;

    let file = fs::File::create(output)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut archive = tar::Builder::new(encoder);
    archive.append_dir_all(&slug, &root)?;
    archive.into_inner()?.finish()?;

    info!(topic, path = %output.display(), "bundle written");
    Ok(output.to_path_buf())
}

/// A minimal viewer page with the snapshot inlined.
fn index_html(topic: &str, snapshot_svg: &[u8]) -> String {
    let svg = String::from_utf8_lossy(snapshot_svg);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>body{{margin:0;display:flex;justify-content:center}}svg{{max-width:100vw;max-height:100vh}}</style>\n\
         </head>\n<body>\n{svg}</body>\n</html>\n",
        title = escape_html(topic),
        svg = svg
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_graph;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    #[test]
    fn test_bundle_contains_expected_entries() {
        let out_dir = TempDir::new().unwrap();
        let output = out_dir.path().join("rust.tar.gz");
        let graph = default_graph("Rust");

        write_bundle("Rust", &graph, b"<svg></svg>", &output).unwrap();
        assert!(output.exists());

        let file = fs::File::open(&output).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().display().to_string())
            .collect();

        for expected in [
            "Rust/graph.json",
            "Rust/snapshot.svg",
            "Rust/manifest.json",
            "Rust/index.html",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_index_html_inlines_snapshot() {
        let html = index_html("Graphs & <Things>", b"<svg>payload</svg>");
        assert!(html.contains("Graphs &amp; &lt;Things&gt;"));
        assert!(html.contains("<svg>payload</svg>"));
    }
}
