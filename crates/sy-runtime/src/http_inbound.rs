//! HTTP Inbound (C8): a minimal router bound to a single sequence, one
//! catch-all `"/"` handler. `run` drives this listener until `cancellation`
//! fires; it never calls its own stop — the supervisor owns the signal
//! and cancels it externally.

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use sy_common::{MessageContext, PropertyValue};
use sy_mediation::MediationContext;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const SHUTDOWN_BUDGET: Duration = Duration::from_secs(10);

pub async fn run(
    inbound_name: String,
    sequence_name: String,
    mediation: MediationContext,
    host: &str,
    port: u16,
    cancellation: CancellationToken,
) -> std::io::Result<()> {
    let sequence_name_for_handler = sequence_name.clone();
    let router = Router::new().route(
        "/",
        any(move |headers: HeaderMap, body: Bytes| {
            let mediation = mediation.clone();
            let sequence_name = sequence_name_for_handler.clone();
            async move { handle(mediation, sequence_name, headers, body).await }
        }),
    );

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("host:port must be a valid socket address");
    let listener = TcpListener::bind(addr).await?;
    info!(inbound = %inbound_name, sequence = %sequence_name, %addr, "HTTP inbound listening");

    let shutdown_signal = cancellation.clone();
    let shutdown_inbound_name = inbound_name.clone();
    let shutdown = async move {
        shutdown_signal.cancelled().await;
        info!(inbound = %shutdown_inbound_name, "HTTP inbound observed cancellation, starting graceful shutdown");
    };

    let serve_future = axum::serve(listener, router).with_graceful_shutdown(shutdown);
    tokio::pin!(serve_future);

    tokio::select! {
        result = &mut serve_future => match result {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(error = %e, "HTTP inbound exited with an error");
                Err(e)
            }
        },
        _ = cancellation.cancelled() => {
            match tokio::time::timeout(SHUTDOWN_BUDGET, serve_future).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!(error = %e, "HTTP inbound exited with an error");
                    Err(e)
                }
                Err(_) => {
                    warn!(inbound = %inbound_name, "HTTP inbound graceful shutdown deadline exceeded, connections were force-closed");
                    Ok(())
                }
            }
        }
    }
}

async fn handle(mediation: MediationContext, sequence_name: String, headers: HeaderMap, body: Bytes) -> Response {
    let mut msg = MessageContext::new();
    msg.content_type = headers.get("content-type").and_then(|v| v.to_str().ok()).unwrap_or("").to_string();
    for (key, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            msg.headers.insert(key.as_str(), v);
        }
    }
    msg.set_property(
        "http_request_body",
        PropertyValue::String(String::from_utf8_lossy(&body).into_owned()),
    );
    msg.payload = body.to_vec();

    let sequence = match mediation.graph.sequence(&sequence_name) {
        Some(s) => s.clone(),
        None => {
            error!(sequence = %sequence_name, "HTTP inbound sequence not found, dropping request");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let success = sy_mediation::execute_resource(&sequence, None, &mut msg, &mediation).await;
    if !success {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if !msg.is_marked_for_response() {
        return StatusCode::ACCEPTED.into_response();
    }

    let mut response = Response::builder().status(StatusCode::OK);
    for (key, value) in msg.headers.iter() {
        response = response.header(key, value);
    }
    response.body(axum::body::Body::from(msg.payload)).unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
