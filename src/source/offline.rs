//! Offline graph source.

use tracing::debug;

use crate::models::{GraphData, default_graph};
use crate::source::{GenerateOutcome, GraphSource};
use crate::{Error, Result};

/// Serves the built-in starter graph without any network access.
///
/// Node expansion is not available offline; the operation fails with a
/// capability error and no state change.
#[derive(Debug, Default)]
pub struct OfflineSource;

impl GraphSource for OfflineSource {
    fn generate(&self, topic: &str) -> Result<GenerateOutcome> {
        debug!(topic, "serving offline starter graph");
        Ok(GenerateOutcome {
            graph: default_graph(topic),
            narration: None,
        })
    }

    fn expand(&self, _node_id: &str, _label: &str, _graph: &GraphData) -> Result<GraphData> {
        Err(Error::MissingCapability(
            "node expansion requires an online graph source".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_serves_starter_graph() {
        let outcome = OfflineSource.generate("Rust").unwrap();
        assert_eq!(outcome.graph.nodes[0].label, "Rust");
        assert_eq!(outcome.graph.edges.len(), 3);
    }

    #[test]
    fn test_expand_is_missing_capability() {
        let graph = default_graph("Rust");
        let err = OfflineSource.expand("topic", "Rust", &graph).unwrap_err();
        assert!(matches!(err, Error::MissingCapability(_)));
    }
}
