pub mod api;
pub mod cors;
pub mod endpoint;
pub mod error;
pub mod graph;
pub mod inbound;
pub mod mediator;
pub mod sequence;
pub mod uri_template;

pub use api::{Api, Resource, VersionType};
pub use cors::CorsConfig;
pub use endpoint::{Endpoint, EndpointHttp};
pub use error::{ModelError, PositionedModelError};
pub use graph::ArtifactGraph;
pub use inbound::{ActionAfterProcess, FilePollerParams, Inbound, InboundProtocol};
pub use mediator::{
    CallMediator, LogCategory, LogMediator, MediaType, Mediator, MediatorKind, PayloadMediator,
    RespondMediator, VariableMediator, VariableType,
};
pub use sequence::Sequence;
pub use uri_template::UriTemplateInfo;
