use agora::{
    AgoraConfig, AppState, Coordinator, Query,
    agents::default_roster,
    cli::{Cli, Commands, output::Output},
    utils::config::{LogFormat, ServerConfig},
};
use anyhow::Context;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config = AgoraConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    init_tracing(&config.server, cli.verbose);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, &output).await,
        Commands::Ask { query, timeout } => ask(config, &query, timeout, &output).await,
        Commands::Roster => {
            output.roster(&default_roster());
            Ok(())
        }
    }
}

/// Logs go to stderr so `ask` output stays pipeable.
fn init_tracing(server: &ServerConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { server.log_level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match server.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn serve(config: AgoraConfig, output: &Output) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let deadline = config.research.deadline();

    let state = AppState::from_config(config)
        .await
        .context("failed to assemble the research team")?;
    let workers = state.roster.len();
    let app = agora::api::app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    output.banner();
    output.kv("Server URL", &format!("http://{}", addr));
    output.kv("Research workers", &workers.to_string());
    output.kv("Run deadline", &format!("{}s", deadline.as_secs()));
    output.header("Endpoints");
    output.list_item("POST /api/research               - Run the research team");
    output.list_item("POST /api/research/{id}/cancel   - Not supported (501)");
    output.list_item("GET  /api/agents                 - Research roster");
    output.list_item("GET  /api/openapi.json           - OpenAPI document");
    output.list_item("GET  /health                     - Health check");
    output.newline();

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

async fn ask(
    config: AgoraConfig,
    query: &str,
    timeout: Option<u64>,
    output: &Output,
) -> anyhow::Result<()> {
    let query = Query::new(query)?;
    let deadline = timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.research.deadline());

    let team = Coordinator::from_config(&config).await?;
    output.info(&format!(
        "Researching \"{}\" with {} workers (deadline {}s)",
        query,
        team.workers().len(),
        deadline.as_secs()
    ));

    match team.run(&query, deadline).await {
        Ok(report) => {
            output.report(&report);
            output.success("Research complete");
            Ok(())
        }
        Err(e) => {
            output.error(&e.to_string());
            if e.is_timeout() {
                output.hint("Try again with a narrower question or a longer --timeout");
            }
            Err(e.into())
        }
    }
}
