//! Graph source boundary.
//!
//! Graph content comes from an external collaborator behind the
//! [`GraphSource`] trait: an HTTP implementation speaking an
//! OpenAI-compatible chat-completions endpoint, and an offline
//! implementation that serves the built-in starter graph and reports node
//! expansion as unavailable.

mod http;
mod offline;

pub use http::HttpSource;
pub use offline::OfflineSource;

use crate::Result;
use crate::models::GraphData;

/// The result of a generation call.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    /// The normalized concept graph.
    pub graph: GraphData,
    /// Optional narration script accompanying the graph.
    pub narration: Option<String>,
}

/// A provider of concept graphs.
pub trait GraphSource {
    /// Generate a concept graph for a topic.
    fn generate(&self, topic: &str) -> Result<GenerateOutcome>;

    /// Generate additional nodes/edges branching off an existing node.
    ///
    /// `graph` is the current graph, used to steer the provider away from
    /// concepts that are already present. Sources without this capability
    /// return [`crate::Error::MissingCapability`].
    fn expand(&self, node_id: &str, label: &str, graph: &GraphData) -> Result<GraphData>;
}
