use crate::handlers;
use crate::store::GameStore;
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::Filter;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Loopback on an ephemeral port.
    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Shared components every route needs.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    store: Arc<GameStore>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            store: Arc::new(GameStore::new()),
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<GameStore> {
        Arc::clone(&self.store)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    ConfigError(String),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            context: AppContext::new(config),
        }
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let bind_addr = Self::bind_addr(context.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(address = %addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route();
        let api_routes = Self::api_routes(context);

        health.or(api_routes).unify().boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })).into_response())
            .boxed()
    }

    fn api_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let store = context.store();

        let start = warp::path!("api" / "games")
            .and(warp::post())
            .and(Self::with_store(store.clone()))
            .and(warp::body::json())
            .and_then(
                |store: Arc<GameStore>, request: handlers::StartGameRequest| async move {
                    let response = handlers::start_game(store, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let join = warp::path!("api" / "games" / String / "players")
            .and(warp::post())
            .and(Self::with_store(store.clone()))
            .and(warp::body::json())
            .and_then(
                |game_id: String, store: Arc<GameStore>, request: handlers::JoinGameRequest| async move {
                    let response = handlers::join_game(store, game_id, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let events = warp::path!("api" / "games" / String / "events")
            .and(warp::post())
            .and(Self::with_store(store.clone()))
            .and(warp::body::json())
            .and_then(
                |game_id: String, store: Arc<GameStore>, request: handlers::GameEventRequest| async move {
                    let response = handlers::submit_event(store, game_id, request).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let view = warp::path!("api" / "games" / String)
            .and(warp::get())
            .and(Self::with_store(store))
            .and(warp::query::<handlers::ViewQuery>())
            .and_then(
                |game_id: String, store: Arc<GameStore>, query: handlers::ViewQuery| async move {
                    let response = handlers::get_game(store, game_id, query).await;
                    Ok::<_, Infallible>(response)
                },
            );

        start
            .or(join)
            .unify()
            .or(events)
            .unify()
            .or(view)
            .unify()
            .boxed()
    }

    fn with_store(
        store: Arc<GameStore>,
    ) -> impl Filter<Extract = (Arc<GameStore>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&store))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
