//! Agent-builder actions - the operations the HTTP layer exposes.

mod builders;
mod graph;
mod policy;

pub use builders::{
    create_agent_builder, delete_agent_builder, get_agent_builder, get_agent_builders,
    update_agent_info,
};
pub use graph::{
    export_agent_graph_code, get_agent_app_info, get_agent_lineages, get_graph_template,
    get_graph_templates, save_agent_graph, stream_agent_graph,
};
pub use policy::{get_agent_builder_policy, set_agent_builder_policy};
