//! Ferret-RS: a federated keyword search orchestrator
//!
//! This is the main entry point for the application.

use anyhow::{Context as _, Result};
use clap::Parser;
use ferret_rs::{
    cli::{format_results, Cli, Command},
    config::{self, Settings},
    goto::{CommandOpener, DEFAULT_GOTO_COMMAND},
    network::HttpClient,
    providers::ProviderLoader,
    query::{parse_goto, parse_limit, parse_page, parse_timeout},
    search::{Query, Search, SearchContext},
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so search output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = config::load(cli.config.as_deref())?;
    let search = build_search(&settings)?;

    match cli.command {
        Command::Search {
            provider,
            keyword,
            page,
            limit,
            goto,
            timeout,
        } => {
            let query = Query::new(provider, keyword.unwrap_or_default())
                .with_page(parse_page(page.as_deref()))
                .with_limit(parse_limit(limit.as_deref()))
                .with_goto(parse_goto(goto.as_deref()))
                .with_timeout(parse_timeout(timeout.as_deref(), search.default_timeout()));

            let ctx = SearchContext::background();
            let interrupt = ctx.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    interrupt.cancel();
                }
            });

            let query = search.execute(&ctx, query).await?;
            if query.goto == 0 {
                print!("{}", format_results(&query));
            }
            Ok(())
        }
        Command::Listen => listen(settings, search).await,
    }
}

/// Wire the HTTP client, providers and goto command into an executor
fn build_search(settings: &Settings) -> Result<Search> {
    let client = HttpClient::with_settings(&settings.outgoing)?;
    let registry = ProviderLoader::load(settings, client)?;

    let goto_cmd = if settings.search.goto_cmd.is_empty() {
        DEFAULT_GOTO_COMMAND
    } else {
        settings.search.goto_cmd.as_str()
    };

    Ok(Search::new(Arc::new(registry))
        .with_timeout(settings.query_timeout())
        .with_opener(Arc::new(CommandOpener::new(goto_cmd))))
}

async fn listen(settings: Settings, search: Search) -> Result<()> {
    let addr = SocketAddr::new(
        settings
            .listen
            .address
            .parse()
            .with_context(|| format!("invalid listen address {}", settings.listen.address))?,
        settings.listen.port,
    );

    let state = AppState::new(&settings, search)?;
    info!(
        "Serving providers: {}",
        state
            .providers
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let app = create_router(state);

    info!("Starting ferret-rs v{} on http://{}", ferret_rs::VERSION, addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
