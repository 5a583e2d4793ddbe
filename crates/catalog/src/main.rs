use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::{
    app::create_app,
    config::{Config, LogFormat, StorageBackend},
    state::AppState,
    storage::{
        dynamodb::{create_client, ensure_shows_table, ClientOptions, DynamoDbGateway},
        memory_shows_gateway, StorageGateway,
    },
};

/// Catalog - validate, store and list TV shows
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Print every stored show as one JSON document per line
    Export,
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "8080", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    init_tracing(&config);

    tracing::info!(
        env = config.env.as_str(),
        table = %config.dynamodb.shows_table,
        "Loaded configuration"
    );
    tracing::debug!(
        user_pool_id = %config.cognito.user_pool_id,
        client_id = %config.cognito.client_id,
        region = %config.cognito.region,
        jwks_url = %config.cognito.jwks_url,
        scopes = ?config.cognito.valid_scopes,
        "Auth settings"
    );

    let gateway = init_gateway(&config).await?;

    match cli.command {
        Some(Command::Export) => export(gateway, config).await,
        Some(Command::Serve(args)) => serve(gateway, config, args).await,
        None => serve(gateway, config, cli.serve).await,
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Build the storage gateway selected by configuration.
async fn init_gateway(config: &Config) -> Result<Arc<dyn StorageGateway>> {
    let table_name = config.dynamodb.shows_table.clone();

    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!(table = %table_name, "Using in-memory storage, data is not persisted");
            Ok(Arc::new(memory_shows_gateway(table_name)))
        }
        StorageBackend::DynamoDb => {
            let options = ClientOptions {
                region: config.dynamodb.region.clone(),
                endpoint_url: config.endpoint_override().map(str::to_string),
            };
            tracing::info!(target_store = %options.target_display(), "Connecting to DynamoDB");

            let client = create_client(&options).await;
            if config.dynamodb.create_table_if_missing {
                ensure_shows_table(&client, &table_name)
                    .await
                    .context("failed to provision shows table")?;
            }

            Ok(Arc::new(DynamoDbGateway::new(client, table_name)))
        }
    }
}

async fn serve(gateway: Arc<dyn StorageGateway>, config: Config, args: ServeArgs) -> Result<()> {
    let state = AppState::new(gateway, config);
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        None => {
            let addr = format!("{}:{}", args.host, args.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn export(gateway: Arc<dyn StorageGateway>, config: Config) -> Result<()> {
    let state = AppState::new(gateway, config);
    let shows = state.service.export().await?;

    let mut stdout = std::io::stdout().lock();
    for show in &shows {
        serde_json::to_writer(&mut stdout, show)?;
        writeln!(stdout)?;
    }

    tracing::info!(count = shows.len(), "Exported shows");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
