//! Generates an OpenAPI 3.0.3 document from a deployed `Api` at request
//! time — the shape of the document is only known once the artifact
//! graph is built, so this constructs the JSON value directly rather
//! than through `#[utoipa::path]`, which fixes its shape at compile
//! time. Since JSON is a syntactic subset of YAML, the same value is
//! reused verbatim for the `swagger.yaml` variant.

use serde_json::{json, Value};
use sy_model::Api;

pub fn build_openapi(api: &Api) -> Value {
    let mut paths = serde_json::Map::new();

    for resource in &api.resources {
        let mut parameters = Vec::new();
        for param_name in &resource.uri_template.path_params {
            parameters.push(json!({
                "name": param_name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" },
            }));
        }
        for query_key in resource.uri_template.query_params.keys() {
            parameters.push(json!({
                "name": query_key,
                "in": "query",
                "required": true,
                "schema": { "type": "string" },
            }));
        }

        let operation = json!({
            "parameters": parameters,
            "responses": {
                "200": { "description": "mediation succeeded" },
                "202": { "description": "accepted, no response body" },
                "400": { "description": "invalid query parameters" },
                "500": { "description": "mediation failed" },
            }
        });

        let path_item = paths
            .entry(resource.uri_template.path_template.clone())
            .or_insert_with(|| json!({}));
        if let Value::Object(map) = path_item {
            for method in &resource.methods {
                map.insert(method.to_ascii_lowercase(), operation.clone());
            }
        }
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": api.name,
            "version": api.version.clone().unwrap_or_else(|| "unversioned".to_string()),
        },
        "paths": Value::Object(paths),
    })
}
