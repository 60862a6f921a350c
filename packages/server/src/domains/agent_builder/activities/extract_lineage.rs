//! Lineage extraction: node references -> typed "uses" edges.
//!
//! Every reference is read from node data without network access except
//! prompts, whose owning project decides whether the edge is recorded.
//! Edges are emitted per node, so two nodes using the same tool produce
//! two identical edges.

use std::collections::HashMap;
use std::sync::Arc;

use sktai_client::{GraphNode, LineageAction, LineageEdge, LineageObjectType};
use tracing::{debug, warn};

use crate::common::DomainError;
use crate::domains::agent_builder::models::{HasReferences, ResourceRef};
use crate::kernel::BasePromptService;

pub struct LineageExtractor {
    prompts: Arc<dyn BasePromptService>,
}

impl LineageExtractor {
    pub fn new(prompts: Arc<dyn BasePromptService>) -> Self {
        Self { prompts }
    }

    /// Derive the edges from `graph_id` to every resource its nodes reference.
    ///
    /// Prompt references owned by another project than `home_project_id` are
    /// dropped. A prompt that no longer exists is dropped too; any other
    /// prompt lookup failure aborts the extraction.
    pub async fn extract(
        &self,
        graph_id: &str,
        home_project_id: &str,
        nodes: &[GraphNode],
    ) -> Result<Vec<LineageEdge>, DomainError> {
        // One lookup per distinct prompt id within a run
        let mut prompt_owned: HashMap<String, bool> = HashMap::new();
        let mut edges = Vec::new();

        for node in nodes {
            for reference in node.references() {
                if let ResourceRef::Prompt(prompt_id) = &reference {
                    let owned = match prompt_owned.get(prompt_id) {
                        Some(owned) => *owned,
                        None => {
                            let owned = self.prompt_in_project(prompt_id, home_project_id).await?;
                            prompt_owned.insert(prompt_id.clone(), owned);
                            owned
                        }
                    };
                    if !owned {
                        debug!(
                            graph_id,
                            node_id = %node.id,
                            prompt_id = %prompt_id,
                            "Skipping prompt outside home project"
                        );
                        continue;
                    }
                }
                edges.push(uses_edge(graph_id, &reference));
            }
        }

        debug!(graph_id, nodes = nodes.len(), edges = edges.len(), "Lineage extracted");
        Ok(edges)
    }

    async fn prompt_in_project(
        &self,
        prompt_id: &str,
        home_project_id: &str,
    ) -> Result<bool, DomainError> {
        match self.prompts.get_inference_prompt(prompt_id).await {
            Ok(prompt) => Ok(prompt.project_id.as_deref() == Some(home_project_id)),
            Err(e) if e.is_not_found() => {
                warn!(prompt_id, "Referenced prompt not found, no lineage recorded");
                Ok(false)
            }
            Err(e) => Err(DomainError::upstream("prompt lookup", e)),
        }
    }
}

fn uses_edge(graph_id: &str, reference: &ResourceRef) -> LineageEdge {
    LineageEdge {
        source_key: graph_id.to_string(),
        source_type: LineageObjectType::AgentGraph,
        target_key: reference.key().to_string(),
        target_type: reference.object_type(),
        action: LineageAction::Use,
    }
}
