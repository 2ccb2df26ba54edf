use crate::path::validate_query;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, RawQuery};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use sy_common::{MessageContext, PropertyValue};
use sy_model::Resource;
use tracing::{error, info};

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Serves the OpenAPI document for `GET /<APIName>[:<version>]`. The
/// wire contract selects the representation with a bare query key —
/// `?swagger.yaml` or `?swagger.json` — rather than a key=value pair;
/// JSON is served by default since it is also valid YAML.
pub async fn openapi_document(doc: serde_json::Value, RawQuery(raw_query): RawQuery) -> Response {
    let as_yaml = raw_query.as_deref().is_some_and(|q| q.split('&').any(|key| key == "swagger.yaml"));
    render_openapi_document(doc, as_yaml).await
}

async fn render_openapi_document(doc: serde_json::Value, as_yaml: bool) -> Response {
    if as_yaml {
        (
            StatusCode::OK,
            [("Content-Type", "application/yaml")],
            serde_json::to_string_pretty(&doc).unwrap_or_default(),
        )
            .into_response()
    } else {
        (StatusCode::OK, Json(doc)).into_response()
    }
}

/// Per-resource handler: populates the Message Context, runs the
/// configured query-parameter validation, executes the resource's
/// sequence, and writes the response per the respond-flag policy.
pub async fn handle_resource(
    state: AppState,
    api_name: String,
    resource: Resource,
    AxumPath(path_params): AxumPath<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query_pairs: Vec<(String, String)> = raw_query
        .as_deref()
        .map(|q| {
            url_decode_query(q)
        })
        .unwrap_or_default();

    if let Err(reason) = validate_query(&resource.uri_template.query_params, query_pairs.iter().map(|(k, _)| k.clone())) {
        crate::metrics::record_request_rejected(&api_name, "query_validation");
        return (StatusCode::BAD_REQUEST, reason).into_response();
    }

    let mut msg = MessageContext::new();
    msg.payload = body.to_vec();
    msg.content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    for (key, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            msg.headers.insert(key.as_str(), v);
        }
    }

    let uri_params: HashMap<String, String> = path_params.clone();
    msg.set_property("uriParams", PropertyValue::Json(serde_json::to_value(&uri_params).unwrap_or_default()));

    let query_by_var: HashMap<String, String> = query_pairs
        .iter()
        .filter_map(|(key, value)| {
            resource
                .uri_template
                .query_params
                .get(key)
                .map(|var_name| (var_name.clone(), value.clone()))
        })
        .collect();
    msg.set_property("queryParams", PropertyValue::Json(serde_json::to_value(&query_by_var).unwrap_or_default()));

    info!(api = %api_name, method = %method, path = %resource.uri_template.path_template, "dispatching request");

    let success = sy_mediation::execute_resource(&resource.in_sequence, resource.fault_sequence.as_ref(), &mut msg, &state.mediation).await;

    if !success {
        error!(api = %api_name, "mediation pipeline failed, returning 500");
        crate::metrics::record_request_routed(&api_name, method.as_str(), 500);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    if !msg.is_marked_for_response() {
        crate::metrics::record_request_routed(&api_name, method.as_str(), 202);
        return StatusCode::ACCEPTED.into_response();
    }

    crate::metrics::record_request_routed(&api_name, method.as_str(), 200);
    let mut response = Response::builder().status(StatusCode::OK);
    for (key, value) in msg.headers.iter() {
        response = response.header(key, value);
    }
    response.body(axum::body::Body::from(msg.payload)).unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn url_decode_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded_parse(query)
}

/// Minimal `application/x-www-form-urlencoded` query-string parser: the
/// router only needs key/value pairs for declared-param validation, not
/// a general encoder.
fn form_urlencoded_parse(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (percent_decode(k), percent_decode(v)),
            None => (percent_decode(pair), String::new()),
        })
        .collect()
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                if let Ok(byte) = u8::from_str_radix(&raw[i + 1..i + 3], 16) {
                    out.push(byte);
                    i += 3;
                } else {
                    out.push(bytes[i]);
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
