use crate::cursor::{attr, Cursor};
use crate::error::DeployError;
use std::io::Read;
use std::time::Duration;
use sy_model::{Endpoint, EndpointHttp};

pub fn parse_endpoint<R: Read>(cursor: &mut Cursor<R>) -> Result<Endpoint, DeployError> {
    let attributes = cursor.expect_start("endpoint")?;
    let name = attr(&attributes, "name")
        .ok_or_else(|| DeployError::parse(cursor.position(), "endpoint missing 'name' attribute"))?
        .to_string();
    let position = cursor.position_at(&name);

    cursor.skip_text()?;
    let http_attrs = cursor.expect_start("http")?;
    let method = attr(&http_attrs, "method")
        .ok_or_else(|| DeployError::parse(position.clone(), "endpoint/http missing 'method' attribute"))?
        .to_string();
    let uri = attr(&http_attrs, "uri-template")
        .ok_or_else(|| DeployError::parse(position.clone(), "endpoint/http missing 'uri-template' attribute"))?
        .to_string();
    let timeout = attr(&http_attrs, "timeout-ms")
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis);
    cursor.skip_text()?;
    cursor.expect_end("http")?;
    cursor.skip_text()?;
    cursor.expect_end("endpoint")?;

    Ok(Endpoint {
        name,
        http: EndpointHttp { method, uri, timeout },
        position,
    })
}
