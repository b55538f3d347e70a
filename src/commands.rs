//! Command handlers for the `mg` CLI.
//!
//! Each handler returns an [`Output`]: a JSON value plus a human-readable
//! rendering, selected by the global `--human` flag in `main`.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::warn;

use crate::bundle::write_bundle;
use crate::config::Settings;
use crate::models::GraphData;
use crate::source::{GraphSource, HttpSource, OfflineSource};
use crate::storage::ResourceCache;
use crate::view::layout::LayoutKind;
use crate::view::surface::MemorySurface;
use crate::view::theme::{BackgroundKind, ThemeKind};
use crate::view::viewmodel::GraphViewModel;
use crate::{Error, Result};

/// A command result in both output formats.
#[derive(Debug)]
pub struct Output {
    pub json: serde_json::Value,
    pub human: String,
}

/// `mg generate <topic>`
pub fn generate(topic: &str, offline: bool, no_cache: bool, settings: &Settings) -> Result<Output> {
    let cache = ResourceCache::open()?;

    if !no_cache {
        if let Some(graph) = cache.load_graph(topic) {
            return Ok(generate_output(topic, &graph, true));
        }
    }

    let outcome = pick_source(offline, settings)?.generate(topic)?;
    cache.save_graph(topic, &outcome.graph)?;
    if let Some(narration) = &outcome.narration {
        cache.save_narration(topic, narration)?;
    }

    Ok(generate_output(topic, &outcome.graph, false))
}

fn pick_source(offline: bool, settings: &Settings) -> Result<Box<dyn GraphSource>> {
    if offline {
        return Ok(Box::new(OfflineSource));
    }
    match settings.api_key() {
        Some(key) => Ok(Box::new(HttpSource::new(
            &settings.api.base_url,
            &key,
            &settings.api.model,
        ))),
        None => {
            warn!(
                key_env = %settings.api.key_env,
                "no API key set, falling back to the offline source"
            );
            Ok(Box::new(OfflineSource))
        }
    }
}

fn generate_output(topic: &str, graph: &GraphData, cached: bool) -> Output {
    Output {
        json: json!({
            "topic": topic,
            "cached": cached,
            "graph": graph,
        }),
        human: format!(
            "{} \"{}\": {} nodes, {} edges{}",
            if cached { "Cached graph for" } else { "Generated graph for" },
            topic,
            graph.nodes.len(),
            graph.edges.len(),
            if cached { "" } else { " (cached for reuse)" },
        ),
    }
}

/// `mg render <graph.json>`
pub fn render(
    input: &Path,
    theme: Option<&str>,
    layout: Option<&str>,
    background: Option<&str>,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<Output> {
    let graph = read_graph(input)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("svg"));

    let theme = theme.unwrap_or(&settings.theme);
    let layout = layout.unwrap_or(&settings.layout);
    let background = background.unwrap_or(&settings.background);

    let model = run_pipeline(graph, theme, layout, background, settings);
    std::fs::write(&output, model.export_snapshot())?;

    let state = model.state();
    Ok(Output {
        json: json!({
            "input": input,
            "output": output,
            "theme": state.theme.name(),
            "layout": state.layout.name(),
            "background": state.background.name(),
            "nodes": state.data.nodes.len(),
            "edges": state.data.edges.len(),
        }),
        human: format!(
            "Rendered {} nodes / {} edges with theme {}, layout {} -> {}",
            state.data.nodes.len(),
            state.data.edges.len(),
            state.theme.name(),
            state.layout.name(),
            output.display(),
        ),
    })
}

/// `mg bundle <graph.json>`
pub fn bundle(
    input: &Path,
    topic: Option<&str>,
    theme: Option<&str>,
    layout: Option<&str>,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<Output> {
    let graph = read_graph(input)?;
    let topic = topic
        .map(str::to_string)
        .or_else(|| {
            input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "topic".to_string());
    let output: PathBuf = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("tar.gz"));

    let theme = theme.unwrap_or(&settings.theme);
    let layout = layout.unwrap_or(&settings.layout);
    let model = run_pipeline(graph, theme, layout, &settings.background, settings);

    let path = write_bundle(&topic, &model.state().data, &model.export_snapshot(), &output)?;
    Ok(Output {
        json: json!({
            "topic": topic,
            "output": path,
        }),
        human: format!("Bundled \"{}\" -> {}", topic, path.display()),
    })
}

/// `mg themes`
pub fn themes() -> Output {
    let names: Vec<&str> = ThemeKind::all().iter().map(|t| t.name()).collect();
    let backgrounds: Vec<&str> = BackgroundKind::all().iter().map(|b| b.name()).collect();
    Output {
        json: json!({ "themes": names, "backgrounds": backgrounds }),
        human: format!(
            "Themes: {}\nBackgrounds: {}",
            names.join(", "),
            backgrounds.join(", ")
        ),
    }
}

/// `mg layouts`
pub fn layouts() -> Output {
    let names: Vec<&str> = LayoutKind::all().iter().map(|l| l.name()).collect();
    Output {
        json: json!({ "layouts": names }),
        human: format!("Layouts: {}", names.join(", ")),
    }
}

/// `mg cache path`
pub fn cache_path() -> Result<Output> {
    let cache = ResourceCache::open()?;
    Ok(Output {
        json: json!({ "path": cache.base() }),
        human: cache.base().display().to_string(),
    })
}

/// `mg cache clear`
pub fn cache_clear() -> Result<Output> {
    let cache = ResourceCache::open()?;
    let removed = cache.clear()?;
    Ok(Output {
        json: json!({ "removed": removed }),
        human: format!("Removed {} cached entries", removed),
    })
}

/// Load a graph file, run the full style/layout/reveal pipeline on the
/// in-memory surface, and return the completed view model.
fn run_pipeline(
    graph: GraphData,
    theme: &str,
    layout: &str,
    background: &str,
    settings: &Settings,
) -> GraphViewModel<MemorySurface> {
    let mut model =
        GraphViewModel::with_reveal_config(MemorySurface::new(), settings.reveal_config());
    model.set_theme(theme);
    model.set_layout(layout);
    model.load(graph);
    model.finish_reveal();
    model.set_background(background);
    model
}

fn read_graph(input: &Path) -> Result<GraphData> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| Error::InvalidInput(format!("cannot read {}: {}", input.display(), e)))?;
    let graph: GraphData = serde_json::from_str(&text)?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_graph;
    use tempfile::TempDir;

    #[test]
    fn test_themes_listing() {
        let output = themes();
        assert!(output.human.contains("rainbow"));
        assert_eq!(output.json["themes"][0], "default");
    }

    #[test]
    fn test_layouts_listing() {
        let output = layouts();
        assert!(output.human.contains("concentric"));
        assert!(output.json["layouts"].as_array().unwrap().len() >= 10);
    }

    #[test]
    fn test_render_writes_svg() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("graph.json");
        std::fs::write(
            &input,
            serde_json::to_string(&default_graph("Rust")).unwrap(),
        )
        .unwrap();

        let output = render(
            &input,
            Some("rainbow"),
            Some("grid"),
            None,
            None,
            &Settings::default(),
        )
        .unwrap();

        let svg_path = input.with_extension("svg");
        assert!(svg_path.exists());
        let svg = std::fs::read_to_string(svg_path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(output.json["theme"], "rainbow");
        assert_eq!(output.json["layout"], "grid");
    }

    #[test]
    fn test_render_rejects_unreadable_input() {
        let err = render(
            Path::new("/nonexistent/graph.json"),
            None,
            None,
            None,
            None,
            &Settings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_bundle_writes_archive() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("graph.json");
        std::fs::write(
            &input,
            serde_json::to_string(&default_graph("Rust")).unwrap(),
        )
        .unwrap();

        let output = bundle(&input, None, None, None, None, &Settings::default()).unwrap();
        assert!(input.with_extension("tar.gz").exists());
        assert_eq!(output.json["topic"], "graph");
    }
}
