//! HTTP Router & CORS (C6). Builds one axum `Router` registering the two
//! built-ins plus every deployed API's resources, and serves it with a
//! bounded graceful shutdown observing the process-wide cancellation
//! signal.

use crate::cors::build_layer;
use crate::handlers::{handle_resource, livez, openapi_document};
use crate::openapi::build_openapi;
use crate::path::to_axum_path;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, RawQuery};
use axum::http::{HeaderMap, Method};
use axum::routing::{on, MethodFilter};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const SHUTDOWN_BUDGET: Duration = Duration::from_secs(10);

pub fn build_router(state: &AppState, metrics_handle: PrometheusHandle) -> Router {
    let mut router = Router::new()
        .route("/livez", axum::routing::get(livez))
        .route("/metrics", axum::routing::get(move || async move { metrics_handle.render() }));

    for api in state.graph.apis() {
        let base_path = api.base_path();
        let base_path = base_path.strip_suffix('/').unwrap_or(&base_path).to_string();
        let mut api_router = Router::new();

        for resource in api.resources.iter().cloned() {
            let full_path = format!("{base_path}{}", resource.uri_template.path_template);
            let axum_path = to_axum_path(&full_path);

            let method_filter = resource
                .methods
                .iter()
                .filter_map(|m| Method::from_str(m).ok())
                .filter_map(|m| MethodFilter::try_from(m).ok())
                .reduce(|a, b| a | b);

            let Some(method_filter) = method_filter else {
                warn!(api = %api.name, resource = %resource.uri_template.full_template, "resource has no usable HTTP methods, skipping");
                continue;
            };

            let handler_state = state.clone();
            let api_name = api.name.clone();
            let handler = move |AxumPath(path_params): AxumPath<HashMap<String, String>>,
                                 RawQuery(raw_query): RawQuery,
                                 method: Method,
                                 headers: HeaderMap,
                                 body: Bytes| {
                let handler_state = handler_state.clone();
                let api_name = api_name.clone();
                let resource = resource.clone();
                async move {
                    handle_resource(
                        handler_state,
                        api_name,
                        resource,
                        AxumPath(path_params),
                        RawQuery(raw_query),
                        method,
                        headers,
                        body,
                    )
                    .await
                }
            };

            api_router = api_router.route(&axum_path, on(method_filter, handler));
        }

        if api.cors.enabled {
            api_router = api_router.layer(build_layer(&api.cors));
        }
        router = router.merge(api_router);

        let doc_path = format!("/{}", api.name);
        let doc = build_openapi(api);
        let versioned_doc_path = match &api.version {
            Some(v) => format!("/{}:{}", api.name, v),
            None => doc_path.clone(),
        };
        let doc_for_handler = doc.clone();
        router = router.route(
            &doc_path,
            axum::routing::get(move |RawQuery(raw_query): RawQuery| {
                let doc = doc_for_handler.clone();
                async move { openapi_document(doc, RawQuery(raw_query)).await }
            }),
        );
        if versioned_doc_path != doc_path {
            router = router.route(
                &versioned_doc_path,
                axum::routing::get(move |RawQuery(raw_query): RawQuery| {
                    let doc = doc.clone();
                    async move { openapi_document(doc, RawQuery(raw_query)).await }
                }),
            );
        }
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use indexmap::IndexMap;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use sy_common::{DrainGroup, Position};
    use sy_mediation::MediationContext;
    use sy_model::{Api, ArtifactGraph, CorsConfig, Mediator, MediatorKind, Resource, RespondMediator, Sequence, UriTemplateInfo};
    use tower::ServiceExt;

    fn pos() -> Position {
        Position::new("test.xml".to_string(), 1, "TestAPI".to_string())
    }

    fn empty_sequence() -> Sequence {
        Sequence {
            name: None,
            mediators: vec![Mediator {
                kind: MediatorKind::Respond(RespondMediator),
                position: pos(),
            }],
            position: pos(),
        }
    }

    fn echo_api() -> Api {
        let mut query_params = IndexMap::new();
        query_params.insert("name".to_string(), "name".to_string());
        Api {
            name: "Echo".to_string(),
            context: "/echo".to_string(),
            version: None,
            version_type: None,
            resources: vec![Resource {
                methods: vec!["GET".to_string()],
                uri_template: UriTemplateInfo {
                    full_template: "/greet?name={name}".to_string(),
                    path_template: "/greet".to_string(),
                    path_params: Vec::new(),
                    query_params,
                },
                in_sequence: empty_sequence(),
                fault_sequence: None,
                position: pos(),
            }],
            cors: CorsConfig::default(),
            position: pos(),
        }
    }

    fn test_router() -> Router {
        router_for_apis(vec![echo_api()])
    }

    fn router_for_apis(apis: Vec<Api>) -> Router {
        let mut graph = ArtifactGraph::new();
        for api in apis {
            graph.insert_api(api).unwrap();
        }
        let graph = std::sync::Arc::new(graph);
        let mediation = MediationContext::new(graph.clone(), CancellationToken::new(), DrainGroup::new());
        let state = AppState { graph, mediation };
        let handle = PrometheusBuilder::new().build_recorder().handle();
        build_router(&state, handle)
    }

    #[tokio::test]
    async fn livez_reports_up() {
        let router = test_router();
        let response = router.oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn echo_resource_with_declared_query_param_succeeds() {
        let router = test_router();
        let response = router
            .oneshot(Request::builder().uri("/echo/greet?name=world").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn echo_resource_rejects_undeclared_query_param() {
        let router = test_router();
        let response = router
            .oneshot(Request::builder().uri("/echo/greet?bogus=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let router = test_router();
        let response = router.oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }

    fn cors_api() -> Api {
        let mut api = echo_api();
        api.name = "CorsEcho".to_string();
        api.context = "/cors-echo".to_string();
        api.cors = CorsConfig {
            enabled: true,
            allow_origins: vec!["https://allowed.example".to_string()],
            ..Default::default()
        };
        api
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_header() {
        let router = router_for_apis(vec![cors_api()]);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/cors-echo/greet?name=world")
                    .header("Origin", "https://allowed.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://allowed.example"
        );
    }

    #[tokio::test]
    async fn disallowed_origin_gets_no_cors_header() {
        let router = router_for_apis(vec![cors_api()]);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/cors-echo/greet?name=world")
                    .header("Origin", "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}

/// Serves `router` until `cancellation` fires, then gives in-flight
/// requests `SHUTDOWN_BUDGET` to finish before forcing the listener
/// closed.
pub async fn serve(router: Router, host: &str, port: u16, cancellation: CancellationToken) -> std::io::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse().expect("host:port must be a valid socket address");
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP router listening");

    let shutdown_signal = cancellation.clone();
    let shutdown = async move {
        shutdown_signal.cancelled().await;
        info!("router observed cancellation, starting graceful shutdown");
    };

    let serve_future = axum::serve(listener, router).with_graceful_shutdown(shutdown);
    tokio::pin!(serve_future);

    tokio::select! {
        result = &mut serve_future => match result {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(error = %e, "HTTP server exited with an error");
                Err(e)
            }
        },
        _ = cancellation.cancelled() => {
            match tokio::time::timeout(SHUTDOWN_BUDGET, serve_future).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!(error = %e, "HTTP server exited with an error");
                    Err(e)
                }
                Err(_) => {
                    warn!("HTTP server graceful shutdown deadline exceeded, connections were force-closed");
                    Ok(())
                }
            }
        }
    }
}
