//! HTTP Server
//!
//! Wraps the payment routes in the common middleware and runs them until a
//! shutdown signal arrives.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Db;
use crate::payment::Payment;

use super::response::ApiError;
use super::routes::{not_found, payment_routes};

/// Build the full service router: routes, fallback and middleware
///
/// Every response, errors and the fallback included, is sent as
/// `application/json`.
pub fn router<D>(db: Arc<D>, config: &Config) -> Router
where
    D: Db<Payment> + 'static,
{
    payment_routes(db)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware::from_fn_with_state(
            Duration::from_millis(config.request_timeout_ms),
            enforce_timeout,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Answer 408 with an error body once a request runs past `limit`
///
/// Store work already handed to the blocking pool is not cancelled; only the
/// response is abandoned.
async fn enforce_timeout(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "request timed out");
            ApiError::Timeout("request timed out".to_string()).into_response()
        }
    }
}

/// HTTP server for the payment service
pub struct HttpServer {
    router: Router,
    shutdown_timeout: Duration,
}

impl HttpServer {
    /// Create a server over `db` using the service settings in `config`
    pub fn new<D>(db: Arc<D>, config: &Config) -> Self
    where
        D: Db<Payment> + 'static,
    {
        Self {
            router: router(db, config),
            shutdown_timeout: Duration::from_millis(config.shutdown_timeout_ms),
        }
    }

    /// Get the router (for testing)
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `signal` resolves
    ///
    /// After the signal the server stops accepting connections and waits up
    /// to the shutdown timeout for in-flight requests before returning.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "payment service listening");
        }

        let stop = Arc::new(Notify::new());
        let server = axum::serve(listener, self.router)
            .with_graceful_shutdown({
                let stop = Arc::clone(&stop);
                async move { stop.notified().await }
            })
            .into_future();
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => return result,
            () = signal => {}
        }

        tracing::info!("shutdown signal received, draining connections");
        stop.notify_one();

        match tokio::time::timeout(self.shutdown_timeout, server).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.shutdown_timeout.as_millis() as u64,
                    "in-flight requests did not finish before shutdown timeout"
                );
                Ok(())
            }
        }
    }
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received SIGINT"),
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGINT");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("received SIGTERM");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
