//! Chatty CLI and REST API entry point.
//!
//! Binary name: `chatty`
//!
//! Parses CLI arguments, loads config.toml, opens the database, then
//! dispatches to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;

use chatty_infra::config::{load_global_config, resolve_data_dir};
use chatty_observe::tracing_setup::{init_tracing, shutdown_tracing};
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir();
    let config = load_global_config(&data_dir).await;

    init_tracing(&config.logging, cli.log_filter_override())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let state = AppState::init(data_dir, config).await?;

    match cli.command {
        Commands::Save { user_id, message } => {
            cli::chat::save_message(&state, &user_id, &message, cli.json).await?;
        }

        Commands::History { user_id } => {
            cli::chat::show_history(&state, &user_id, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            let swagger = state.config.server.enable_swagger;

            tracing::info!(%addr, "chat history API listening");
            if !cli.quiet {
                println!(
                    "  {} Chatty API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                if swagger {
                    println!(
                        "  {} {}",
                        console::style("Docs:").dim(),
                        console::style(format!("http://{addr}/swagger-ui")).cyan()
                    );
                }
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }
    }

    shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
