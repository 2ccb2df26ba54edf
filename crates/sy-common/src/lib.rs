pub mod drain;
pub mod error;
pub mod headers;
pub mod logging;
pub mod message;
pub mod position;

pub use drain::DrainGroup;
pub use error::{Result, SwitchyardError};
pub use headers::Headers;
pub use message::{MessageContext, PropertyValue, HTTP_RESPONSE_HEADER};
pub use position::Position;
