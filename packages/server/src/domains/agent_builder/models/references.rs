//! Typed reference fields carried in node `data`.
//!
//! A node's data map is read into zero or more [`NodeBinding`]s, one per
//! reference field that is present and well formed. Each binding knows which
//! resources it points at through [`HasReferences`]. A node whose data holds
//! none of the known fields has no bindings and so no references.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use sktai_client::{GraphNode, LineageObjectType};

lazy_static! {
    // 8-4-4-4-12 hex; "D" and other placeholders mean "no model selected"
    static ref UUID_REGEX: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    ).unwrap();
}

/// One external resource a node depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    ServingModel(String),
    Prompt(String),
    Tool(String),
    FewShot(String),
    Mcp(String),
    Knowledge(String),
}

impl ResourceRef {
    pub fn key(&self) -> &str {
        match self {
            ResourceRef::ServingModel(id)
            | ResourceRef::Prompt(id)
            | ResourceRef::Tool(id)
            | ResourceRef::FewShot(id)
            | ResourceRef::Mcp(id)
            | ResourceRef::Knowledge(id) => id,
        }
    }

    pub fn object_type(&self) -> LineageObjectType {
        match self {
            ResourceRef::ServingModel(_) => LineageObjectType::ServingModel,
            ResourceRef::Prompt(_) => LineageObjectType::Prompt,
            ResourceRef::Tool(_) => LineageObjectType::Tool,
            ResourceRef::FewShot(_) => LineageObjectType::FewShot,
            ResourceRef::Mcp(_) => LineageObjectType::Mcp,
            ResourceRef::Knowledge(_) => LineageObjectType::Knowledge,
        }
    }
}

pub trait HasReferences {
    fn references(&self) -> Vec<ResourceRef>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBinding {
    pub serving_model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBinding {
    pub prompt_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBinding {
    pub tool_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FewShotBinding {
    pub fewshot_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpBinding {
    pub catalog_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBinding {
    pub repo_id: String,
}

/// A reference field found in node data, tagged by what it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBinding {
    Model(ModelBinding),
    Prompt(PromptBinding),
    Tool(ToolBinding),
    FewShot(FewShotBinding),
    Mcp(McpBinding),
    Knowledge(KnowledgeBinding),
}

impl ModelBinding {
    fn from_data(data: &Map<String, Value>) -> Option<Self> {
        let value = data.get("serving_model")?.as_str()?;
        UUID_REGEX.is_match(value).then(|| Self {
            serving_model: value.to_string(),
        })
    }
}

impl PromptBinding {
    fn from_data(data: &Map<String, Value>) -> Option<Self> {
        non_blank(data.get("prompt_id")).map(|prompt_id| Self { prompt_id })
    }
}

impl ToolBinding {
    fn from_data(data: &Map<String, Value>) -> Option<Self> {
        let tool_ids: Vec<String> = data
            .get("tool_ids")?
            .as_array()?
            .iter()
            .filter_map(|id| non_blank(Some(id)))
            .collect();
        (!tool_ids.is_empty()).then_some(Self { tool_ids })
    }
}

impl FewShotBinding {
    fn from_data(data: &Map<String, Value>) -> Option<Self> {
        non_blank(data.get("fewshot_id")).map(|fewshot_id| Self { fewshot_id })
    }
}

impl McpBinding {
    fn from_data(data: &Map<String, Value>) -> Option<Self> {
        let catalog_ids: Vec<String> = data
            .get("mcp_catalogs")?
            .as_array()?
            .iter()
            .filter_map(|catalog| non_blank(catalog.get("id")))
            .collect();
        (!catalog_ids.is_empty()).then_some(Self { catalog_ids })
    }
}

impl KnowledgeBinding {
    fn from_data(data: &Map<String, Value>) -> Option<Self> {
        let repo_id = data.get("knowledge_retriever")?.get("repo_id");
        non_blank(repo_id).map(|repo_id| Self { repo_id })
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Bindings present in a node's data, in field order.
pub fn bindings(data: &Map<String, Value>) -> Vec<NodeBinding> {
    [
        ModelBinding::from_data(data).map(NodeBinding::Model),
        PromptBinding::from_data(data).map(NodeBinding::Prompt),
        ToolBinding::from_data(data).map(NodeBinding::Tool),
        FewShotBinding::from_data(data).map(NodeBinding::FewShot),
        McpBinding::from_data(data).map(NodeBinding::Mcp),
        KnowledgeBinding::from_data(data).map(NodeBinding::Knowledge),
    ]
    .into_iter()
    .flatten()
    .collect()
}

impl HasReferences for ModelBinding {
    fn references(&self) -> Vec<ResourceRef> {
        vec![ResourceRef::ServingModel(self.serving_model.clone())]
    }
}

impl HasReferences for PromptBinding {
    fn references(&self) -> Vec<ResourceRef> {
        vec![ResourceRef::Prompt(self.prompt_id.clone())]
    }
}

impl HasReferences for ToolBinding {
    fn references(&self) -> Vec<ResourceRef> {
        self.tool_ids.iter().cloned().map(ResourceRef::Tool).collect()
    }
}

impl HasReferences for FewShotBinding {
    fn references(&self) -> Vec<ResourceRef> {
        vec![ResourceRef::FewShot(self.fewshot_id.clone())]
    }
}

impl HasReferences for McpBinding {
    fn references(&self) -> Vec<ResourceRef> {
        self.catalog_ids.iter().cloned().map(ResourceRef::Mcp).collect()
    }
}

impl HasReferences for KnowledgeBinding {
    fn references(&self) -> Vec<ResourceRef> {
        vec![ResourceRef::Knowledge(self.repo_id.clone())]
    }
}

impl HasReferences for NodeBinding {
    fn references(&self) -> Vec<ResourceRef> {
        match self {
            NodeBinding::Model(b) => b.references(),
            NodeBinding::Prompt(b) => b.references(),
            NodeBinding::Tool(b) => b.references(),
            NodeBinding::FewShot(b) => b.references(),
            NodeBinding::Mcp(b) => b.references(),
            NodeBinding::Knowledge(b) => b.references(),
        }
    }
}

impl HasReferences for GraphNode {
    fn references(&self) -> Vec<ResourceRef> {
        bindings(&self.data)
            .iter()
            .flat_map(|binding| binding.references())
            .collect()
    }
}
