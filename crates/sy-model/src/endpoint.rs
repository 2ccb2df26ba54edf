//! Endpoint shapes — named, reusable call targets referenced by
//! `CallMediator::endpoint_ref`.

use sy_common::Position;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointHttp {
    pub method: String,
    pub uri: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub http: EndpointHttp,
    pub position: Position,
}
