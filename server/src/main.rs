use anyhow::Context;
use tokio::net::TcpListener;
use todo_server::config::StoreBackend;
use todo_server::{db, AllowedOrigins, Config, MemoryStore, MySqlStore, TodoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let origins = AllowedOrigins::new(config.external_origin.as_deref());
    tracing::info!(origins = ?origins.as_slice(), "cross-origin allow-list");

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server running at PORT {}", config.port);

    match config.backend {
        StoreBackend::MySql => {
            let pool = db::connect_lazy(&config.database);
            serve(listener, MySqlStore::new(pool.clone()), origins).await?;
            pool.close().await;
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            serve(listener, MemoryStore::new(), origins).await?;
        }
    }

    tracing::info!("shut down");
    Ok(())
}

async fn serve<S: TodoStore>(
    listener: TcpListener,
    store: S,
    origins: AllowedOrigins,
) -> anyhow::Result<()> {
    axum::serve(listener, todo_server::app(store, origins))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
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
                tracing::error!("failed to listen for SIGTERM: {e}");
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
