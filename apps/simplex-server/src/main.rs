//! Simplex demo server.
//!
//! Serves a small set of routes over the single-exchange HTTP transport:
//! one request per connection, closed after the response is written.
//!
//! # Usage
//!
//! ```text
//! HTTP_PORT=8000 simplex-server
//! simplex-server --health-check   # probe a running instance, exit 0/1
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HTTP_HOST` | `0.0.0.0` | Bind host |
//! | `HTTP_PORT` | `8000` | Bind port |
//! | `HTTP_BACKLOG` | `512` | Listen backlog depth |
//! | `MAX_CONNECTIONS` | `1024` | Concurrent connection cap |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter, overrides `LOG_LEVEL` |

use anyhow::{Context, Result};
use serde_json::json;
use simplex_core::{Method, ServerConfig};
use simplex_http::{ReturnValue, Router, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server version reported on the health route.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("loading configuration")?;

    // Probe mode for container HEALTHCHECK directives.
    if std::env::args().any(|arg| arg == "--health-check") {
        let host = if config.host == "0.0.0.0" {
            "127.0.0.1"
        } else {
            config.host.as_str()
        };
        let addr = format!("{host}:{}", config.port);
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    let router = build_router();
    let routes = router.len();

    let server = Server::bind(&config, router)
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;

    info!(
        addr = %server.local_addr()?,
        routes,
        version = VERSION,
        "starting simplex server"
    );

    tokio::select! {
        result = server.run() => result.context("server terminated")?,
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal, exiting");
        }
    }

    Ok(())
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` when set, otherwise the configured log level.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the demo route table.
fn build_router() -> Router {
    let mut router = Router::new();

    router
        .route("/", &[Method::Get], |_| Ok("Hello World".into()))
        .route("/health", &[Method::Get], |_| {
            Ok(json!({ "status": "running", "version": VERSION }).into())
        })
        .route("/echo", &[Method::Post], |request| {
            let body = request
                .json
                .clone()
                .context("echo requires a JSON request body")?;
            Ok(ReturnValue::Json(body))
        });

    router
}

/// Probe a running server over raw TCP.
///
/// Succeeds when the health route answers with a 200 status and reports
/// itself running.
async fn run_health_check(addr: &str) -> Result<()> {
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;
    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.starts_with("HTTP/1.1 200") && response.contains("\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}: {response:?}")
    }
}
