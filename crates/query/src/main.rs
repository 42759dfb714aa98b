use anyhow::Result;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use query::{GeminiTranslator, GraphConnector, QueryConfig, Session};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("query=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run());

    // a pending stdin read after Ctrl-C would otherwise hold shutdown open
    runtime.shutdown_background();
    code
}

async fn run() -> ExitCode {
    let config = match QueryConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let connector = match GraphConnector::connect(&config.neo4j).await {
        Ok(connector) => connector,
        Err(e) => {
            println!("Failed to connect to Neo4j: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to Neo4j.");

    let translator = GeminiTranslator::new(&config.gemini);

    let outcome = tokio::select! {
        result = session(&connector, &translator) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            Ok(())
        }
    };

    let code = match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("\nError: {e:#}");
            ExitCode::FAILURE
        }
    };

    connector.close();
    println!("\nConnection closed.");
    code
}

async fn session(connector: &GraphConnector, translator: &GeminiTranslator) -> Result<()> {
    println!("Fetching graph schema");
    let schema = connector.get_schema().await?;
    println!("Schema loaded");
    println!("Type 'exit' to quit.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    Session::new(connector, translator, &schema)
        .run(stdin, &mut stdout)
        .await
}
