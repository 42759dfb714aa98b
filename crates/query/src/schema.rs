use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One result row: column name -> value, in the order the driver returned them.
pub type ResultRow = serde_json::Map<String, serde_json::Value>;

/// Distinct entity and relationship `type` values present in the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSchema {
    pub node_labels: BTreeSet<String>,
    pub relationship_types: BTreeSet<String>,
}

/// What the model hands back for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedQuery {
    pub query: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl TranslatedQuery {
    pub fn explanation_or_default(&self) -> &str {
        self.explanation
            .as_deref()
            .unwrap_or("No explanation provided.")
    }
}
