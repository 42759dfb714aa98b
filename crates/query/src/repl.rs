use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::graph::{GraphConnector, GraphStore};
use crate::render::render_results;
use crate::schema::GraphSchema;
use crate::translator::GeminiTranslator;

pub const PROMPT: &str = "Ask your knowledge graph a question > ";
const SEPARATOR_WIDTH: usize = 50;

/// What happened to a single line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Blank input, nothing sent anywhere
    Skipped,
    /// The model gave us nothing we could run
    NoQuery,
    /// The query ran and failed
    QueryFailed,
    /// The query ran; this many rows were rendered
    Answered(usize),
}

pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// One interactive session against a fixed schema snapshot.
pub struct Session<'a, S> {
    connector: &'a GraphConnector<S>,
    translator: &'a GeminiTranslator,
    schema: &'a GraphSchema,
}

impl<'a, S: GraphStore> Session<'a, S> {
    pub fn new(
        connector: &'a GraphConnector<S>,
        translator: &'a GeminiTranslator,
        schema: &'a GraphSchema,
    ) -> Self {
        Self {
            connector,
            translator,
            schema,
        }
    }

    /// Read questions until `exit` or end of input.
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                writeln!(out)?;
                break;
            };
            if is_exit(&line) {
                break;
            }

            self.answer(&line, out).await?;
        }

        Ok(())
    }

    /// translate -> execute -> render for a single question. Only I/O errors
    /// on `out` are returned; everything else degrades to a [`Turn`].
    pub async fn answer<W: Write>(&self, question: &str, out: &mut W) -> Result<Turn> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(Turn::Skipped);
        }

        writeln!(out, "\nTranslating your question...")?;
        let translated = match self.translator.translate(self.schema, question).await {
            Some(translated) if !translated.query.trim().is_empty() => translated,
            _ => {
                writeln!(out, "Could not generate valid query.\n")?;
                return Ok(Turn::NoQuery);
            }
        };

        writeln!(out, "Generated Query: {}", translated.query)?;
        writeln!(out, "Explanation: {}\n", translated.explanation_or_default())?;

        let turn = match self.connector.run_query(&translated.query).await {
            Some(rows) => {
                writeln!(out, "{}", render_results(Some(rows.as_slice())).trim_end())?;
                Turn::Answered(rows.len())
            }
            None => Turn::QueryFailed,
        };

        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        Ok(turn)
    }
}
