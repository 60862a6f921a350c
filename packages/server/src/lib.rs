// SKTAI admin backend - API core
//
// Agent builder graphs, the lineage they imply, and the visibility scope of
// platform resources, over the SKTAI platform services.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
