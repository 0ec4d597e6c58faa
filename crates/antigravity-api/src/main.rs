//! Antigravity CLI and HTTP entry point.
//!
//! Binary name: `agbot`
//!
//! Parses CLI arguments, loads configuration and credentials, then dispatches
//! to the appropriate command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;

use antigravity_infra::config::{apply_env_overrides, load_app_config, resolve_config_path};
use antigravity_observe::tracing_setup::init_tracing;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,antigravity_core=debug,antigravity_infra=debug,agbot=debug",
        _ => "trace",
    };
    init_tracing(cli.log_format, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config_path = resolve_config_path(cli.config.clone());
    let config = apply_env_overrides(load_app_config(&config_path).await, |name| {
        std::env::var(name).ok()
    });

    let state = AppState::init(config).await?;

    match cli.command {
        Commands::Chat { user } => {
            cli::chat::loop_runner::run_chat_loop(&state, &user).await?;
        }

        Commands::Ask { user, message } => {
            cli::chat::ask(&state, &user, &message.join(" "), cli.json).await?;
        }

        Commands::Personas => {
            cli::persona::list_personas(&state, cli.json).await?;
        }

        Commands::Persona { user, id } => match id {
            Some(id) => cli::persona::switch(&state, &user, &id, cli.json).await?,
            None => cli::persona::show_active(&state, cli.json).await?,
        },

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Antigravity listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }
    }

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
