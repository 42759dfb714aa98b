pub mod columns;
pub mod config;
pub mod graph;
pub mod prompt;
pub mod render;
pub mod repl;
pub mod schema;
pub mod translator;

pub use config::{ConfigError, GeminiConfig, Neo4jConfig, QueryConfig};
pub use graph::{GraphConnector, GraphStore, Neo4jStore};
pub use render::render_results;
pub use repl::{Session, Turn};
pub use schema::{GraphSchema, ResultRow, TranslatedQuery};
pub use translator::{GeminiTranslator, TranslateError};
