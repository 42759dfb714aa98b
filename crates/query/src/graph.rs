use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use std::collections::BTreeSet;
use tracing::{error, info};

use crate::columns::{order_columns, return_columns};
use crate::config::Neo4jConfig;
use crate::schema::{GraphSchema, ResultRow};

const NODE_TYPES_QUERY: &str = "MATCH (n:ENTITY) RETURN DISTINCT n.type AS label";
const RELATIONSHIP_TYPES_QUERY: &str =
    "MATCH ()-[r:RELATIONSHIP]->() RETURN DISTINCT r.type AS type";

/// Anything that can run a Cypher statement and hand back its rows.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn fetch_rows(&self, cypher: &str) -> Result<Vec<ResultRow>>;
}

pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect and verify the server answers before handing the store out.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .build()
            .context("Invalid Neo4j configuration")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context(format!("Failed to connect to Neo4j at {}", config.uri))?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Failed to verify Neo4j connectivity")?;

        Ok(Self { graph })
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    // Each call checks a connection out of the pool and returns it when the
    // stream is dropped at the end of the call.
    async fn fetch_rows(&self, cypher: &str) -> Result<Vec<ResultRow>> {
        let mut result = self.graph.execute(Query::new(cypher.to_string())).await?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            let row: ResultRow = row.to().context("Failed to decode result row")?;
            rows.push(row);
        }

        Ok(rows)
    }
}

pub struct GraphConnector<S = Neo4jStore> {
    store: S,
}

impl GraphConnector<Neo4jStore> {
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        let store = Neo4jStore::connect(config).await?;
        info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self::new(store))
    }
}

impl<S: GraphStore> GraphConnector<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Snapshot of the distinct entity and relationship types.
    pub async fn get_schema(&self) -> Result<GraphSchema> {
        let node_labels = self
            .distinct_values(NODE_TYPES_QUERY, "label")
            .await
            .context("Failed to fetch entity types")?;
        let relationship_types = self
            .distinct_values(RELATIONSHIP_TYPES_QUERY, "type")
            .await
            .context("Failed to fetch relationship types")?;

        Ok(GraphSchema {
            node_labels,
            relationship_types,
        })
    }

    async fn distinct_values(&self, cypher: &str, column: &str) -> Result<BTreeSet<String>> {
        let rows = self.store.fetch_rows(cypher).await?;

        // nodes without a `type` property come back as null
        Ok(rows
            .iter()
            .filter_map(|row| row.get(column)?.as_str().map(str::to_string))
            .collect())
    }

    /// `None` when execution failed, `Some(vec![])` when it matched nothing.
    /// Columns come back in `RETURN` order where the projection names them.
    pub async fn run_query(&self, cypher: &str) -> Option<Vec<ResultRow>> {
        match self.store.fetch_rows(cypher).await {
            Ok(rows) => {
                let columns = return_columns(cypher);
                Some(
                    rows.into_iter()
                        .map(|row| order_columns(row, &columns))
                        .collect(),
                )
            }
            Err(e) => {
                error!(error = ?e, cypher, "Query failed");
                None
            }
        }
    }

    /// Release the driver and its pooled connections.
    pub fn close(self) {
        drop(self.store);
        info!("Neo4j connection closed");
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order and records every statement it saw.
    #[derive(Default)]
    pub struct FakeStore {
        responses: Mutex<VecDeque<Result<Vec<ResultRow>>>>,
        pub seen: Mutex<Vec<String>>,
    }

    impl FakeStore {
        pub fn with_responses(responses: Vec<Result<Vec<ResultRow>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GraphStore for FakeStore {
        async fn fetch_rows(&self, cypher: &str) -> Result<Vec<ResultRow>> {
            self.seen.lock().unwrap().push(cypher.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    pub fn row(pairs: &[(&str, serde_json::Value)]) -> ResultRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}
