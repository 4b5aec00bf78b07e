use mnemo_config::Config;
use mnemo_http::AppState;
use tracing::info;

use crate::runtime;

/// Input parameters for the Serve command strategy.
#[derive(Debug, Clone, Default)]
pub struct ServeInput {
    /// Overrides `Config::host` when set.
    pub host: Option<String>,
    /// Overrides `Config::port` when set.
    pub port: Option<u16>,
}

/// Strategy for running the HTTP surface: loads config, builds
/// the orchestrator and its collaborators, and serves `mnemo_http::router`
/// until the process is killed.
#[derive(Debug, Clone, Copy)]
pub struct ServeStrategy;

impl super::CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        info!("loaded configuration (environment={:?})", config.environment);

        let rt = runtime::build(&config).await?;

        let host = input.host.unwrap_or_else(|| config.host.clone());
        let port = input.port.unwrap_or(config.port);

        let state = AppState {
            orchestrator: rt.orchestrator,
            store: rt.store,
            users: rt.users,
            sessions: rt.sessions,
            config: std::sync::Arc::new(config),
        };

        let app = mnemo_http::router(state);
        let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
        info!("listening on {host}:{port}");

        axum::serve(listener, app).await?;
        Ok(())
    }
}
