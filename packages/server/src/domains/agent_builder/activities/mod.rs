//! Agent-builder activities - lineage derivation and execution relay.

pub mod extract_lineage;
pub mod reconcile_lineage;
pub mod relay_stream;

pub use extract_lineage::LineageExtractor;
pub use reconcile_lineage::{
    content_hash, distinct_edges, LineageReconciler, ReconcileReport, ReplacePhase,
};
pub use relay_stream::RelayStream;
