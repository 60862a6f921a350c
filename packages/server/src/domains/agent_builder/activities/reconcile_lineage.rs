//! Replace an agent's lineage in the Lineage Store with the edges of its
//! latest saved graph.
//!
//! The store offers no transaction, so a replace runs as recorded steps:
//! clear by source key, derive, bulk-create. A run keeps a checkpoint keyed on
//! `graph_id` and the hash of its input; if the create fails, a retry with
//! the same content reuses the derived edges instead of deriving again.
//! Once the clear succeeded, a failure in a later step leaves the agent with
//! no lineage until the next successful run, never with the old edges.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use sktai_client::{GraphNode, LineageEdge};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::extract_lineage::LineageExtractor;
use crate::common::DomainError;
use crate::kernel::BaseLineageStore;

/// Last step a run completed before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacePhase {
    /// Old edges deleted, new set not derived yet
    Cleared,
    /// Old edges deleted and new set derived, not created yet
    Derived,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    content_hash: String,
    /// Set once the run got past derivation
    edges: Option<Vec<LineageEdge>>,
    phase: ReplacePhase,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub graph_id: String,
    pub edges: Vec<LineageEdge>,
    /// True when the edge set came from an earlier interrupted run
    pub reused_derivation: bool,
}

pub struct LineageReconciler {
    extractor: LineageExtractor,
    store: Arc<dyn BaseLineageStore>,
    checkpoints: Mutex<HashMap<String, Checkpoint>>,
}

impl LineageReconciler {
    pub fn new(extractor: LineageExtractor, store: Arc<dyn BaseLineageStore>) -> Self {
        Self {
            extractor,
            store,
            checkpoints: Mutex::new(HashMap::new()),
        }
    }

    /// Make the store hold exactly the edges derived from `nodes` for `graph_id`.
    ///
    /// Running it again with unchanged nodes leaves the same edge set.
    pub async fn reconcile(
        &self,
        graph_id: &str,
        home_project_id: &str,
        nodes: &[GraphNode],
    ) -> Result<ReconcileReport, DomainError> {
        let content_hash = content_hash(home_project_id, nodes)?;
        let derived = self.derived_edges(graph_id, &content_hash).await;

        // Full wipe first, even when resuming: another save may have written since
        self.store
            .delete_lineage(graph_id)
            .await
            .map_err(|e| DomainError::upstream("lineage delete", e))?;

        let reused_derivation = derived.is_some();
        let edges = match derived {
            Some(edges) => {
                info!(graph_id, edges = edges.len(), "Resuming interrupted lineage replace");
                edges
            }
            None => {
                self.record(graph_id, &content_hash, None, ReplacePhase::Cleared)
                    .await;
                let extracted = self
                    .extractor
                    .extract(graph_id, home_project_id, nodes)
                    .await
                    .inspect_err(|_| warn!(graph_id, "Lineage cleared but not derived"))?;
                let edges = distinct_edges(extracted);
                self.record(
                    graph_id,
                    &content_hash,
                    Some(edges.clone()),
                    ReplacePhase::Derived,
                )
                .await;
                edges
            }
        };

        if edges.is_empty() {
            debug!(graph_id, "No references, lineage left empty");
        } else {
            self.store.create_lineage(&edges).await.map_err(|e| {
                warn!(graph_id, edges = edges.len(), "Lineage cleared but not recreated");
                DomainError::upstream("lineage create", e)
            })?;
        }

        self.forget(graph_id).await;
        info!(graph_id, edges = edges.len(), reused_derivation, "Lineage reconciled");

        Ok(ReconcileReport {
            graph_id: graph_id.to_string(),
            edges,
            reused_derivation,
        })
    }

    /// Drop any checkpoint kept for this graph.
    pub async fn forget(&self, graph_id: &str) {
        self.checkpoints.lock().await.remove(graph_id);
    }

    /// Phase an unfinished run for this graph stopped after, if any.
    pub async fn pending_phase(&self, graph_id: &str) -> Option<ReplacePhase> {
        self.checkpoints
            .lock()
            .await
            .get(graph_id)
            .map(|checkpoint| checkpoint.phase)
    }

    // Edges an earlier run derived from the same content, if it got that far
    async fn derived_edges(&self, graph_id: &str, content_hash: &str) -> Option<Vec<LineageEdge>> {
        let mut checkpoints = self.checkpoints.lock().await;
        match checkpoints.get(graph_id) {
            Some(checkpoint) if checkpoint.content_hash == content_hash => checkpoint.edges.clone(),
            Some(_) => {
                // Content changed since the interrupted run
                checkpoints.remove(graph_id);
                None
            }
            None => None,
        }
    }

    async fn record(
        &self,
        graph_id: &str,
        content_hash: &str,
        edges: Option<Vec<LineageEdge>>,
        phase: ReplacePhase,
    ) {
        self.checkpoints.lock().await.insert(
            graph_id.to_string(),
            Checkpoint {
                content_hash: content_hash.to_string(),
                edges,
                phase,
            },
        );
    }
}

/// SHA-256 over the home project and the serialized nodes.
pub fn content_hash(home_project_id: &str, nodes: &[GraphNode]) -> Result<String, DomainError> {
    let serialized = serde_json::to_vec(nodes)
        .map_err(|e| DomainError::Storage(anyhow::Error::new(e).context("serialize graph nodes")))?;
    let mut hasher = Sha256::new();
    hasher.update(home_project_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(&serialized);
    Ok(hex::encode(hasher.finalize()))
}

/// Keep the first edge of each `(target, type)` pair, in order.
pub fn distinct_edges(edges: Vec<LineageEdge>) -> Vec<LineageEdge> {
    let mut seen = HashSet::new();
    edges
        .into_iter()
        .filter(|edge| seen.insert((edge.target_key.clone(), edge.target_type)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{LineageCall, MockLineageStore, MockPromptService};
    use serde_json::json;
    use sktai_client::LineageObjectType;

    fn nodes() -> Vec<GraphNode> {
        serde_json::from_value(json!([
            {"id": "n1", "type": "agent__generator", "data": {
                "serving_model": "11111111-1111-1111-1111-111111111111",
                "prompt_id": "pr-1",
                "tool_ids": ["t-1"]
            }},
            {"id": "n2", "type": "agent__tool", "data": {"tool_ids": ["t-1", "t-2"]}}
        ]))
        .unwrap()
    }

    fn reconciler(
        store: Arc<MockLineageStore>,
    ) -> (LineageReconciler, Arc<MockPromptService>) {
        let prompts = Arc::new(MockPromptService::new().with_prompt("pr-1", "p-1"));
        let extractor = LineageExtractor::new(prompts.clone());
        (LineageReconciler::new(extractor, store), prompts)
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let store = Arc::new(MockLineageStore::new());
        let (reconciler, _) = reconciler(store.clone());

        let first = reconciler.reconcile("g-1", "p-1", &nodes()).await.unwrap();
        let after_first = store.edges_for("g-1");
        reconciler.reconcile("g-1", "p-1", &nodes()).await.unwrap();

        assert_eq!(after_first.len(), 4);
        assert_eq!(store.edges_for("g-1"), after_first);
        assert_eq!(first.edges, after_first);
    }

    #[tokio::test]
    async fn test_duplicate_targets_stored_once() {
        let store = Arc::new(MockLineageStore::new());
        let (reconciler, _) = reconciler(store.clone());

        reconciler.reconcile("g-1", "p-1", &nodes()).await.unwrap();

        let tools: Vec<_> = store
            .edges_for("g-1")
            .into_iter()
            .filter(|e| e.target_type == LineageObjectType::Tool)
            .map(|e| e.target_key)
            .collect();
        assert_eq!(tools, vec!["t-1", "t-2"]);
    }

    #[tokio::test]
    async fn test_empty_graph_clears_without_create() {
        let store = Arc::new(MockLineageStore::new());
        let (reconciler, _) = reconciler(store.clone());
        reconciler.reconcile("g-1", "p-1", &nodes()).await.unwrap();

        let report = reconciler.reconcile("g-1", "p-1", &[]).await.unwrap();

        assert!(report.edges.is_empty());
        assert!(store.edges_for("g-1").is_empty());
        assert_eq!(
            store.calls().last(),
            Some(&LineageCall::Delete("g-1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_retry_after_failed_create_reuses_derivation() {
        let store = Arc::new(MockLineageStore::new().failing_creates(1));
        let (reconciler, prompts) = reconciler(store.clone());

        let err = reconciler.reconcile("g-1", "p-1", &nodes()).await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream { operation: "lineage create", .. }));
        assert!(store.edges_for("g-1").is_empty());
        assert_eq!(reconciler.pending_phase("g-1").await, Some(ReplacePhase::Derived));

        let report = reconciler.reconcile("g-1", "p-1", &nodes()).await.unwrap();

        assert!(report.reused_derivation);
        assert_eq!(store.edges_for("g-1").len(), 4);
        assert_eq!(prompts.calls().len(), 1);
        assert_eq!(reconciler.pending_phase("g-1").await, None);
    }

    #[tokio::test]
    async fn test_changed_content_derives_again() {
        let store = Arc::new(MockLineageStore::new().failing_creates(1));
        let (reconciler, _) = reconciler(store.clone());
        let _ = reconciler.reconcile("g-1", "p-1", &nodes()).await;

        let mut changed = nodes();
        changed.truncate(1);
        let report = reconciler.reconcile("g-1", "p-1", &changed).await.unwrap();

        assert!(!report.reused_derivation);
        assert_eq!(store.edges_for("g-1").len(), 3);
    }

    #[tokio::test]
    async fn test_failed_derivation_still_clears_old_edges() {
        let store = Arc::new(MockLineageStore::new());
        let (reconciler, _) = reconciler(store.clone());
        reconciler.reconcile("g-1", "p-1", &nodes()).await.unwrap();

        let prompts =
            Arc::new(MockPromptService::new().with_failure("pr-1", 503, "prompt service down"));
        let failing = LineageReconciler::new(LineageExtractor::new(prompts), store.clone());
        let err = failing.reconcile("g-1", "p-1", &nodes()).await.unwrap_err();

        assert!(matches!(err, DomainError::Upstream { operation: "prompt lookup", .. }));
        assert!(store.edges_for("g-1").is_empty());
        assert_eq!(failing.pending_phase("g-1").await, Some(ReplacePhase::Cleared));
    }

    #[test]
    fn test_content_hash_depends_on_project() {
        let a = content_hash("p-1", &nodes()).unwrap();
        let b = content_hash("p-2", &nodes()).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, content_hash("p-1", &nodes()).unwrap());
    }
}
