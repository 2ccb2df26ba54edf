use crate::context::MediationContext;
use reqwest::Method;
use std::str::FromStr;
use sy_common::MessageContext;
use sy_model::CallMediator;
use tracing::{debug, warn};

/// Resolves the named endpoint from the artifact graph and issues the
/// request, replacing payload/content-type with the response on any
/// completed exchange. Unlike an outbound gateway mediating
/// business-critical delivery, this layer has no retry or circuit
/// breaker: a non-2xx response is still a successful mediation — only a
/// network/build failure is.
pub async fn execute(
    mediator: &CallMediator,
    msg: &mut MessageContext,
    ctx: &MediationContext,
) -> (bool, Option<String>) {
    let endpoint = match ctx.graph.endpoint(&mediator.endpoint_ref) {
        Some(e) => e,
        None => {
            return (
                false,
                Some(format!("endpoint {:?} not found", mediator.endpoint_ref)),
            )
        }
    };

    let method = match Method::from_str(&endpoint.http.method) {
        Ok(m) => m,
        Err(_) => {
            return (
                false,
                Some(format!("invalid HTTP method {:?}", endpoint.http.method)),
            )
        }
    };

    debug!(endpoint = %mediator.endpoint_ref, uri = %endpoint.http.uri, "call mediator dispatching");

    let mut request = ctx
        .http_client
        .request(method, &endpoint.http.uri)
        .body(msg.payload.clone());
    if !msg.content_type.is_empty() {
        request = request.header("Content-Type", msg.content_type.clone());
    }
    if let Some(timeout) = endpoint.http.timeout {
        request = request.timeout(timeout);
    }

    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(endpoint = %mediator.endpoint_ref, error = %e, "call mediator request failed");
            return (false, Some(format!("outbound request failed: {e}")));
        }
    };

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = match response.bytes().await {
        Ok(b) => b,
        Err(e) => return (false, Some(format!("failed reading response body: {e}"))),
    };

    msg.payload = body.to_vec();
    msg.content_type = content_type.clone();
    if !content_type.is_empty() {
        msg.headers.insert("Content-Type", content_type);
    }

    (true, None)
}
