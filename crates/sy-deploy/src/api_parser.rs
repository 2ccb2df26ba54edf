//! Parses `<api>` files: the api element itself, its optional `<cors>`
//! child, and each `<resource>`.

use crate::cursor::{attr, Cursor};
use crate::error::DeployError;
use crate::sequence_parser::parse_embedded_sequence;
use std::io::Read;
use sy_model::{Api, CorsConfig, Resource, UriTemplateInfo, VersionType};

pub fn parse_api<R: Read>(cursor: &mut Cursor<R>) -> Result<Api, DeployError> {
    let attributes = cursor.expect_start("api")?;
    let name = attr(&attributes, "name")
        .ok_or_else(|| DeployError::parse(cursor.position(), "api missing 'name' attribute"))?
        .to_string();
    let context = attr(&attributes, "context")
        .ok_or_else(|| DeployError::parse(cursor.position(), "api missing 'context' attribute"))?
        .to_string();
    let version = attr(&attributes, "version").map(str::to_string);
    let version_type = match attr(&attributes, "version-type") {
        Some(raw) => Some(
            VersionType::parse(raw)
                .ok_or_else(|| DeployError::parse(cursor.position(), format!("unknown version-type {raw:?}")))?,
        ),
        None => None,
    };
    let position = cursor.position_at(&name);
    let hierarchy = name.clone();

    cursor.skip_text()?;
    let mut cors = CorsConfig::default();
    if cursor.peek_start().map(|(n, _)| n) == Some("cors") {
        cors = parse_cors(cursor)?;
    }

    let mut resources = Vec::new();
    cursor.skip_text()?;
    while cursor.peek_start().map(|(n, _)| n) == Some("resource") {
        resources.push(parse_resource(cursor, &hierarchy)?);
        cursor.skip_text()?;
    }

    cursor.expect_end("api")?;

    Ok(Api {
        name,
        context,
        version,
        version_type,
        resources,
        cors,
        position,
    })
}

fn parse_cors<R: Read>(cursor: &mut Cursor<R>) -> Result<CorsConfig, DeployError> {
    let attributes = cursor.expect_start("cors")?;
    cursor.skip_text()?;
    cursor.expect_end("cors")?;

    let enabled = attr(&attributes, "enabled")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(true);
    let split = |raw: &str| -> Vec<String> {
        raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
    };

    let mut cors = CorsConfig {
        enabled,
        ..CorsConfig::default()
    };
    if let Some(v) = attr(&attributes, "allow-origins") {
        cors.allow_origins = split(v);
    }
    if let Some(v) = attr(&attributes, "allow-methods") {
        cors.allow_methods = split(v);
    }
    if let Some(v) = attr(&attributes, "allow-headers") {
        cors.allow_headers = split(v);
    }
    if let Some(v) = attr(&attributes, "expose-headers") {
        cors.expose_headers = split(v);
    }
    if let Some(v) = attr(&attributes, "allow-credentials") {
        cors.allow_credentials = v.eq_ignore_ascii_case("true");
    }
    if let Some(v) = attr(&attributes, "max-age") {
        cors.max_age = v.parse().ok();
    }
    Ok(cors)
}

fn parse_resource<R: Read>(cursor: &mut Cursor<R>, api_hierarchy: &str) -> Result<Resource, DeployError> {
    let attributes = cursor.expect_start("resource")?;
    let methods_raw = attr(&attributes, "methods")
        .ok_or_else(|| DeployError::parse(cursor.position(), "resource missing 'methods' attribute"))?;
    let methods: Vec<String> = methods_raw.split_whitespace().map(str::to_string).collect();
    let uri_template_raw = attr(&attributes, "uri-template")
        .ok_or_else(|| DeployError::parse(cursor.position(), "resource missing 'uri-template' attribute"))?;
    let position = cursor.position_at(uri_template_raw);
    let uri_template = UriTemplateInfo::parse(uri_template_raw)
        .map_err(|e| DeployError::model(position.clone(), e))?;

    let hierarchy = format!("{api_hierarchy}->{uri_template_raw}");

    cursor.skip_text()?;
    let in_sequence = parse_embedded_sequence(cursor, "inSequence", &hierarchy)?;
    cursor.skip_text()?;
    let fault_sequence = if cursor.peek_start().map(|(n, _)| n) == Some("faultSequence") {
        Some(parse_embedded_sequence(cursor, "faultSequence", &hierarchy)?)
    } else {
        None
    };

    cursor.skip_text()?;
    cursor.expect_end("resource")?;

    Ok(Resource {
        methods,
        uri_template,
        in_sequence,
        fault_sequence,
        position,
    })
}
