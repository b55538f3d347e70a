//! HTTP graph source speaking an OpenAI-compatible chat-completions API.
//!
//! The provider is asked for a strict JSON object; real responses often
//! arrive wrapped in markdown fences or prose, so the first balanced JSON
//! object is extracted from the content before parsing. The extracted
//! payload is then normalized like any other untrusted graph data.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

use crate::models::{GraphData, normalise, normalise_fragment};
use crate::source::{GenerateOutcome, GraphSource};
use crate::{Error, Result};

/// Graph source backed by a chat-completions endpoint.
#[derive(Debug)]
pub struct HttpSource {
    base_url: String,
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(60))
                .build(),
        }
    }

    /// Send one prompt and return the assistant message content.
    fn request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, "requesting graph generation");

        let response: serde_json::Value = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(json!({
                "model": self.model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": 0.7,
            }))?
            .into_json()?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidInput("provider response had no message content".into()))
    }

    fn generation_prompt(topic: &str) -> String {
        format!(
            "Produce a concept graph for the topic \"{topic}\" as strict JSON: \
             {{\"nodes\":[{{\"id\":\"...\",\"label\":\"...\",\"group\":1}}],\
             \"edges\":[{{\"from\":\"...\",\"to\":\"...\",\"label\":\"...\"}}]}}. \
             Use group 1 for the topic node and group 2+ for sub-concepts, \
             8-14 nodes, short labels. Reply with JSON only."
        )
    }

    fn expansion_prompt(label: &str, graph: &GraphData) -> String {
        let existing = graph
            .nodes
            .iter()
            .map(|n| n.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Expand the concept \"{label}\" with 3-5 new sub-concepts as strict \
             JSON with the same nodes/edges schema as before. Connect every new \
             node to the existing node and avoid these existing concepts: \
             {existing}. Reply with JSON only."
        )
    }
}

impl GraphSource for HttpSource {
    fn generate(&self, topic: &str) -> Result<GenerateOutcome> {
        let content = self.request(&Self::generation_prompt(topic))?;
        let payload = extract_json(&content).unwrap_or_else(|| {
            warn!("no JSON object in provider response, using fallback graph");
            serde_json::Value::Null
        });

        Ok(GenerateOutcome {
            graph: normalise(&payload, topic),
            narration: payload
                .get("narration")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }

    fn expand(&self, node_id: &str, label: &str, graph: &GraphData) -> Result<GraphData> {
        let content = self.request(&Self::expansion_prompt(label, graph))?;
        let payload = extract_json(&content)
            .ok_or_else(|| Error::InvalidInput("expansion response had no JSON object".into()))?;

        let mut fragment = normalise_fragment(&payload, label);
        // The provider sometimes links new nodes to the label instead of
        // the id; rewrite those endpoints onto the expanded node.
        for edge in &mut fragment.edges {
            if edge.from == label {
                edge.from = node_id.to_string();
            }
            if edge.to == label {
                edge.to = node_id.to_string();
            }
        }
        Ok(fragment)
    }
}

/// Extract the first balanced JSON object from free-form text.
///
/// Handles markdown fences and surrounding prose; strings and escapes are
/// respected when balancing braces.
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..start + offset + ch.len_utf8()];
                    return serde_json::from_str(candidate).ok();
                }
            }
            _ => {}
        }
    }
    None
}
