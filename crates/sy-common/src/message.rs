//! The per-request Message Context (C1).

use crate::headers::Headers;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Header written by the Respond mediator and read by the HTTP adapters
/// to decide whether a response body should be written.
pub const HTTP_RESPONSE_HEADER: &str = "http-response";

/// A typed property value.
///
/// The parser validates a `VariableMediator`'s declared type against a
/// whitelist but stores the literal value verbatim (see open question in
/// DESIGN.md) — `PropertyValue` exists so callers reading `uriParams` /
/// `queryParams` get plain strings while `variable` mediators can still
/// carry a `json`/`xml` payload without re-parsing it out of a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Bool(bool),
    Json(serde_json::Value),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

/// Mutable per-request bag threaded through a sequence's mediators.
///
/// Created by the inbound adapter, mutated in place by mediators, discarded
/// when the request terminates. The engine makes no defensive copies; a
/// `MessageContext` is single-threaded within one request.
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    pub payload: Vec<u8>,
    pub content_type: String,
    pub headers: Headers,
    pub properties: IndexMap<String, PropertyValue>,
}

impl MessageContext {
    pub fn new() -> Self {
        Self {
            payload: Vec::new(),
            content_type: String::new(),
            headers: Headers::new(),
            properties: IndexMap::new(),
        }
    }

    pub fn is_marked_for_response(&self) -> bool {
        self.headers.get(HTTP_RESPONSE_HEADER) == Some("true")
    }

    pub fn mark_for_response(&mut self) {
        self.headers.insert(HTTP_RESPONSE_HEADER, "true");
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_empty() {
        let ctx = MessageContext::new();
        assert!(ctx.payload.is_empty());
        assert!(ctx.content_type.is_empty());
        assert!(ctx.headers.is_empty());
        assert!(ctx.properties.is_empty());
        assert!(!ctx.is_marked_for_response());
    }

    #[test]
    fn mark_for_response_is_idempotent() {
        let mut ctx = MessageContext::new();
        ctx.mark_for_response();
        ctx.mark_for_response();
        assert!(ctx.is_marked_for_response());
        assert_eq!(ctx.headers.get(HTTP_RESPONSE_HEADER), Some("true"));
    }
}
