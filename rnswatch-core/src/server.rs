//! HTTP status API.
//!
//! Serves the latest interface status as JSON, plus the static dashboard
//! files. Every `/api/status` request runs a fresh polling cycle.
//!
//! ## Routes
//!
//! | Route             | Response                                              |
//! |-------------------|-------------------------------------------------------|
//! | `GET /api/status` | `200` snapshot JSON, or `500 {"error": ...}`          |
//! | `GET /`           | `<static_dir>/index.html`                             |
//! | `GET /static/*`   | files under `<static_dir>`                            |
//! | `GET /health`     | `200 OK`                                              |
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rnswatch_adapters::RnstatusSource;
//! use rnswatch_core::{ServerConfig, StatusAggregator, StatusServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let aggregator = Arc::new(
//!         StatusAggregator::builder(Arc::new(RnstatusSource::default())).build(),
//!     );
//!
//!     let config = ServerConfig::builder()
//!         .listen_addr("0.0.0.0:8080")
//!         .static_dir("/usr/share/rnswatch/static")
//!         .build();
//!
//!     StatusServer::new(config, aggregator).start();
//!
//!     // Status available at http://localhost:8080/api/status
//! }
//! ```

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::aggregator::StatusAggregator;

const STATUS_PATH: &str = "/api/status";
const STATIC_PREFIX: &str = "/static/";
const STATUS_ERROR_BODY: &str = r#"{"error":"Failed to get status"}"#;

/// Configuration for the status HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8080")
    pub listen_addr: String,
    /// Directory holding `index.html` and other dashboard assets
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// Create a new builder for ServerConfig.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    listen_addr: Option<String>,
    static_dir: Option<PathBuf>,
}

impl ServerConfigBuilder {
    /// Set the listen address.
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = Some(addr.into());
        self
    }

    /// Set the static asset directory.
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Build the ServerConfig.
    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            listen_addr: self.listen_addr.unwrap_or(defaults.listen_addr),
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
        }
    }
}

/// HTTP server exposing the status API.
#[derive(Debug, Clone)]
pub struct StatusServer {
    config: Arc<ServerConfig>,
    aggregator: Arc<StatusAggregator>,
}

impl StatusServer {
    /// Create a new server around a shared aggregator.
    pub fn new(config: ServerConfig, aggregator: Arc<StatusAggregator>) -> Self {
        Self {
            config: Arc::new(config),
            aggregator,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured listen address.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        TcpListener::bind(addr).await
    }

    /// Start the server in a background task.
    ///
    /// The task runs until the runtime shuts down. Bind and accept errors
    /// are logged.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let listener = match self.bind().await {
                Ok(listener) => listener,
                Err(e) => {
                    error!(
                        addr = %self.config.listen_addr,
                        error = %e,
                        "Failed to bind status server"
                    );
                    return;
                }
            };
            if let Err(e) = self.serve(listener).await {
                error!(error = %e, "Status server error");
            }
        })
    }

    /// Accept and serve connections on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "Status server listening");
        }

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    continue;
                }
            };
            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let server = server.clone();
                    async move {
                        Ok::<_, std::convert::Infallible>(
                            server.respond(req.method(), req.uri().path()).await,
                        )
                    }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    error!(%peer, error = %e, "Status connection error");
                }
            });
        }
    }

    /// Produce the response for one request.
    pub async fn respond(&self, method: &Method, path: &str) -> Response<Full<Bytes>> {
        let known = path == STATUS_PATH
            || path == "/"
            || path == "/health"
            || path.starts_with(STATIC_PREFIX);

        if !known {
            return text(StatusCode::NOT_FOUND, "Not Found");
        }
        if method != Method::GET {
            return text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        }

        match path {
            STATUS_PATH => self.status().await,
            "/" => self.static_file(Path::new("index.html")).await,
            "/health" => text(StatusCode::OK, "OK"),
            _ => match safe_relative(&path[STATIC_PREFIX.len()..]) {
                Some(relative) => self.static_file(&relative).await,
                None => text(StatusCode::NOT_FOUND, "Not Found"),
            },
        }
    }

    async fn status(&self) -> Response<Full<Bytes>> {
        // Poll failures are already logged by the aggregator
        let body = match self.aggregator.poll().await {
            Ok(snapshot) => json_body(&snapshot),
            Err(_) => None,
        };

        match body {
            Some(body) => response(StatusCode::OK, "application/json", body),
            None => response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "application/json",
                STATUS_ERROR_BODY,
            ),
        }
    }

    async fn static_file(&self, relative: &Path) -> Response<Full<Bytes>> {
        let path = self.config.static_dir.join(relative);
        match tokio::fs::read(&path).await {
            Ok(content) => response(StatusCode::OK, content_type(&path), content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Static file not served");
                text(StatusCode::NOT_FOUND, "Not Found")
            }
        }
    }
}

fn json_body<T: Serialize>(value: &T) -> Option<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| error!(error = %e, "Failed to serialize status"))
        .ok()
}

fn response(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    response(status, "text/plain; charset=utf-8", body)
}

/// Accept only plain relative paths; no `..`, root or prefix components.
fn safe_relative(path: &str) -> Option<PathBuf> {
    let path = Path::new(path);
    let mut components = path.components().peekable();
    components.peek()?;

    components
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| path.to_path_buf())
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
