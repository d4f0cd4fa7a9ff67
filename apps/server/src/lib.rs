//! # TrailHub Server
//!
//! The registration backend binary: an `Axum` web server over `SurrealDB`
//! with a best-effort SMTP coordinator notifier.
//!
//! ## Example
//! ```no_run
//! use trailhub_kernel::config::{AppConfig, load_config};
//! use trailhub_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg: AppConfig = load_config(Some("server"))?;
//!     Server::builder()
//!         .config(cfg)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

pub mod router;

use anyhow::{Context, Result, bail};
use axum_server::Handle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use trailhub_database::Database;
use trailhub_kernel::config::AppConfig;
use trailhub_kernel::server::AppState;
use trailhub_mailer::Mailer;

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: Option<AppConfig>,
    port: Option<u16>,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = Some(cfg);
        self
    }

    /// Overrides the configured listen port.
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    async fn init_database(cfg: &AppConfig) -> Result<Database> {
        let db_cfg = &cfg.database;
        let mut builder = Database::builder()
            .url(&db_cfg.url)
            .session(&db_cfg.namespace, &db_cfg.database)
            .schema(trailhub_registrations::SCHEMA);

        if let Some(creds) = &db_cfg.credentials {
            builder = builder.auth(&creds.username, &creds.password);
        }

        builder.init().await.context("Failed to establish database connection")
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Establishes the database connection and applies the schema bootstrap
    /// 2. Constructs the coordinator mailer from the (possibly partial) mail config
    /// 3. Builds the shared application state
    ///
    /// # Errors
    /// Returns an error if:
    /// * No configuration was provided
    /// * The database is unreachable, rejects the credentials, or the
    ///   namespace identifiers are malformed
    pub async fn build(self) -> Result<Server> {
        let Some(mut cfg) = self.cfg else {
            bail!("Server configuration is required");
        };
        if let Some(port) = self.port {
            cfg.server.port = port;
        }

        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        info!(address = %address, "Initializing server");

        let db = Self::init_database(&cfg).await?;

        let mailer = Mailer::new(cfg.mail.clone());
        if !mailer.is_configured() {
            info!("Mail transport not fully configured; coordinator notifications will be skipped");
        }

        let state = AppState::builder()
            .config(cfg)
            .db(db)
            .mailer(mailer)
            .build()
            .context("Failed to finalize API state")?;

        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: AppState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);

        let app = router::init(self.state);

        // Graceful shutdown plumbing
        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(30)));
        });

        info!("Starting HTTP server on http://{address}");

        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
