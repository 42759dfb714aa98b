use std::collections::BTreeSet;

use crate::schema::GraphSchema;

pub fn build_translation_prompt(schema: &GraphSchema, question: &str) -> String {
    format!(
        r#"You are an expert Neo4j Cypher query translator. Your task is to convert a user's natural language question into a valid Cypher query based on the provided graph schema.

GRAPH SCHEMA:
- Node Labels: {}
- Relationship Types: {}

SCHEMA DETAILS:
- All nodes have the label 'ENTITY'. The specific type of entity (like 'PERSON' or 'ORGANIZATION') is stored in a property called 'type'.
- All nodes have an 'id' property which is the name of the entity (e.g., 'Google' or 'Elon Musk').
- All relationships have the label 'RELATIONSHIP'. The specific type of relationship (like 'EMPLOYER' or 'CEO_OF') is stored in a property called 'type'.

USER'S QUESTION:
"{}"

Based on the schema and the user's question, generate a Cypher query to find the answer. The query should be compatible with the structured output format requested."#,
        format_list(&schema.node_labels),
        format_list(&schema.relationship_types),
        question
    )
}

fn format_list(values: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    format!("[{}]", quoted.join(", "))
}
