//! Parses `<inbound>` files and, for `protocol="file"`, validates the
//! recognized `transport.vfs.*` parameter keys into `FilePollerParams`.

use crate::cursor::{attr, Cursor};
use crate::error::DeployError;
use indexmap::IndexMap;
use std::io::Read;
use std::time::Duration;
use sy_model::{ActionAfterProcess, FilePollerParams, Inbound, InboundProtocol};

pub fn parse_inbound<R: Read>(cursor: &mut Cursor<R>) -> Result<Inbound, DeployError> {
    let attributes = cursor.expect_start("inbound")?;
    let name = attr(&attributes, "name")
        .ok_or_else(|| DeployError::parse(cursor.position(), "inbound missing 'name' attribute"))?
        .to_string();
    let sequence_ref = attr(&attributes, "sequence")
        .ok_or_else(|| DeployError::parse(cursor.position(), "inbound missing 'sequence' attribute"))?
        .to_string();
    let protocol_raw = attr(&attributes, "protocol")
        .ok_or_else(|| DeployError::parse(cursor.position(), "inbound missing 'protocol' attribute"))?
        .to_string();
    let position = cursor.position_at(&name);

    cursor.skip_text()?;
    let parameters = if cursor.peek_start().map(|(n, _)| n) == Some("parameters") {
        parse_parameters(cursor)?
    } else {
        IndexMap::new()
    };
    cursor.skip_text()?;
    cursor.expect_end("inbound")?;

    let protocol = match protocol_raw.as_str() {
        "http" => InboundProtocol::Http,
        "file" => InboundProtocol::File(parse_file_params(&parameters, &position)?),
        other => return Err(DeployError::parse(position, format!("unknown inbound protocol {other:?}"))),
    };

    Ok(Inbound {
        name,
        sequence_ref,
        protocol,
        position,
    })
}

fn parse_parameters<R: Read>(cursor: &mut Cursor<R>) -> Result<IndexMap<String, String>, DeployError> {
    cursor.expect_start("parameters")?;
    let mut map = IndexMap::new();
    cursor.skip_text()?;
    while cursor.peek_start().map(|(n, _)| n) == Some("parameter") {
        let attributes = cursor.expect_start("parameter")?;
        let key = attr(&attributes, "name")
            .ok_or_else(|| DeployError::parse(cursor.position(), "parameter missing 'name' attribute"))?
            .to_string();
        let value = cursor.collect_text()?;
        cursor.expect_end("parameter")?;
        map.insert(key, value);
        cursor.skip_text()?;
    }
    cursor.expect_end("parameters")?;
    Ok(map)
}

fn parse_file_params(parameters: &IndexMap<String, String>, position: &sy_common::Position) -> Result<FilePollerParams, DeployError> {
    let interval_ms: i64 = parameters
        .get("interval")
        .ok_or_else(|| DeployError::parse(position.clone(), "file inbound requires 'interval'"))?
        .parse()
        .map_err(|_| DeployError::parse(position.clone(), "'interval' must be an integer"))?;
    if interval_ms <= 0 {
        return Err(DeployError::parse(position.clone(), "'interval' must be positive"));
    }

    let file_uri = parameters
        .get("transport.vfs.FileURI")
        .ok_or_else(|| DeployError::parse(position.clone(), "file inbound requires 'transport.vfs.FileURI'"))?
        .clone();
    let content_type = parameters
        .get("transport.vfs.ContentType")
        .ok_or_else(|| DeployError::parse(position.clone(), "file inbound requires 'transport.vfs.ContentType'"))?
        .clone();
    let file_name_pattern = parameters
        .get("transport.vfs.FileNamePattern")
        .cloned()
        .unwrap_or_else(|| ".*".to_string());
    regex::Regex::new(&file_name_pattern)
        .map_err(|e| DeployError::parse(position.clone(), format!("invalid FileNamePattern regex: {e}")))?;

    let sequential = parameters
        .get("sequential")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let coordination = parameters
        .get("coordination")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let action_after_process = parse_action(parameters, "transport.vfs.ActionAfterProcess", ActionAfterProcess::Delete, position)?;
    let action_after_failure = parse_action(parameters, "transport.vfs.ActionAfterFailure", ActionAfterProcess::Delete, position)?;

    let move_after_process = parameters.get("transport.vfs.MoveAfterProcess").cloned();
    if matches!(action_after_process, ActionAfterProcess::Move) && move_after_process.is_none() {
        return Err(DeployError::parse(position.clone(), "ActionAfterProcess=MOVE requires 'transport.vfs.MoveAfterProcess'"));
    }
    let move_after_failure = parameters.get("transport.vfs.MoveAfterFailure").cloned();
    if matches!(action_after_failure, ActionAfterProcess::Move) && move_after_failure.is_none() {
        return Err(DeployError::parse(position.clone(), "ActionAfterFailure=MOVE requires 'transport.vfs.MoveAfterFailure'"));
    }

    let auto_lock_release_interval = match parameters.get("transport.vfs.AutoLockReleaseInterval") {
        Some(raw) => {
            let ms: i64 = raw
                .parse()
                .map_err(|_| DeployError::parse(position.clone(), "'AutoLockReleaseInterval' must be an integer"))?;
            if ms < 0 {
                None
            } else {
                Some(Duration::from_millis(ms as u64))
            }
        }
        None => Some(Duration::from_millis(20_000)),
    };

    Ok(FilePollerParams {
        interval: Duration::from_millis(interval_ms as u64),
        file_uri,
        content_type,
        file_name_pattern,
        sequential,
        coordination,
        action_after_process,
        action_after_failure,
        move_after_process,
        move_after_failure,
        auto_lock_release_interval,
    })
}

fn parse_action(
    parameters: &IndexMap<String, String>,
    key: &str,
    default: ActionAfterProcess,
    position: &sy_common::Position,
) -> Result<ActionAfterProcess, DeployError> {
    match parameters.get(key) {
        Some(raw) => ActionAfterProcess::parse(raw)
            .ok_or_else(|| DeployError::parse(position.clone(), format!("unknown action {raw:?} for {key}"))),
        None => Ok(default),
    }
}
