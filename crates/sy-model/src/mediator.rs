//! Mediator variants (C3 data shapes) — a tagged sum with one arm per
//! variant, each carrying the common `Position` of the wrapping node.
//!
//! Execution lives in `sy-mediation`; this crate only holds the parsed,
//! immutable shape produced by the deployer.

use sy_common::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogCategory {
    /// Parse a category string, treating the empty string as `Info` and
    /// rejecting any value outside the known set.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "" => Some(LogCategory::Info),
            "DEBUG" => Some(LogCategory::Debug),
            "INFO" => Some(LogCategory::Info),
            "WARN" => Some(LogCategory::Warn),
            "ERROR" => Some(LogCategory::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMediator {
    pub category: LogCategory,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RespondMediator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Xml,
}

impl MediaType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "json" => Some(MediaType::Json),
            "xml" => Some(MediaType::Xml),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
            MediaType::Xml => "application/xml",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadMediator {
    pub media_type: MediaType,
    /// The raw inner body of `<format>...</format>`, unvalidated until
    /// the mediator runs.
    pub format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    String,
    Boolean,
    Integer,
    Long,
    Double,
    Json,
    Xml,
}

impl VariableType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "STRING" => Some(VariableType::String),
            "BOOLEAN" => Some(VariableType::Boolean),
            "INTEGER" => Some(VariableType::Integer),
            "LONG" => Some(VariableType::Long),
            "DOUBLE" => Some(VariableType::Double),
            "JSON" => Some(VariableType::Json),
            "XML" => Some(VariableType::Xml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMediator {
    pub name: String,
    pub var_type: VariableType,
    /// Stored verbatim as declared — see the open question in DESIGN.md
    /// about numeric/boolean coercion.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMediator {
    /// Name of the Endpoint this mediator resolves through the Artifact
    /// Graph at request time. Deliberately not a direct pointer, since
    /// Call and Endpoint artifacts are deployed independently and a
    /// named reference lets either be reloaded without the other.
    pub endpoint_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediatorKind {
    Log(LogMediator),
    Respond(RespondMediator),
    Payload(PayloadMediator),
    Variable(VariableMediator),
    Call(CallMediator),
}

/// A single mediator node: the variant plus its diagnostic position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mediator {
    pub kind: MediatorKind,
    pub position: Position,
}

impl Mediator {
    pub fn name(&self) -> &'static str {
        match &self.kind {
            MediatorKind::Log(_) => "log",
            MediatorKind::Respond(_) => "respond",
            MediatorKind::Payload(_) => "payload",
            MediatorKind::Variable(_) => "variable",
            MediatorKind::Call(_) => "call",
        }
    }
}
