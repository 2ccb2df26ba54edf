//! Parses the five recognized mediator elements into `sy_model::Mediator`
//! values, each stamped with its `Position`.

use crate::cursor::{attr, Cursor};
use crate::error::DeployError;
use std::io::Read;
use sy_model::{
    CallMediator, LogCategory, LogMediator, MediaType, Mediator, MediatorKind, PayloadMediator,
    VariableMediator, VariableType,
};

pub fn parse_mediator<R: Read>(cursor: &mut Cursor<R>, hierarchy: &str) -> Result<Mediator, DeployError> {
    let (name, _) = cursor
        .peek_start()
        .ok_or_else(|| DeployError::parse(cursor.position(), "expected a mediator element"))?;
    let name = name.to_string();

    match name.as_str() {
        "log" => parse_log(cursor, hierarchy),
        "respond" => parse_respond(cursor, hierarchy),
        "payload" => parse_payload(cursor, hierarchy),
        "variable" => parse_variable(cursor, hierarchy),
        "call" => parse_call(cursor, hierarchy),
        other => Err(DeployError::parse(cursor.position(), format!("unsupported mediator element <{other}>"))),
    }
}

fn parse_log<R: Read>(cursor: &mut Cursor<R>, hierarchy: &str) -> Result<Mediator, DeployError> {
    let attributes = cursor.expect_start("log")?;
    let position = cursor.position_at(&format!("{hierarchy}->log"));
    let category_raw = attr(&attributes, "category").unwrap_or("");
    let category = LogCategory::parse(category_raw)
        .ok_or_else(|| DeployError::parse(position.clone(), format!("unknown log category {category_raw:?}")))?;

    cursor.skip_text()?;
    let message = if cursor.peek_start().map(|(n, _)| n) == Some("message") {
        cursor.read_text_element("message")?
    } else {
        String::new()
    };
    cursor.expect_end("log")?;

    Ok(Mediator {
        kind: MediatorKind::Log(LogMediator { category, message }),
        position,
    })
}

fn parse_respond<R: Read>(cursor: &mut Cursor<R>, hierarchy: &str) -> Result<Mediator, DeployError> {
    let position = cursor.position_at(&format!("{hierarchy}->respond"));
    // xml-rs normalizes the self-closing `<respond/>` form into a
    // StartElement immediately followed by its EndElement.
    cursor.expect_start("respond")?;
    cursor.expect_end("respond")?;
    Ok(Mediator {
        kind: MediatorKind::Respond(sy_model::RespondMediator),
        position,
    })
}

fn parse_payload<R: Read>(cursor: &mut Cursor<R>, hierarchy: &str) -> Result<Mediator, DeployError> {
    let attributes = cursor.expect_start("payload")?;
    let position = cursor.position_at(&format!("{hierarchy}->payload"));
    let media_type_raw = attr(&attributes, "media-type").unwrap_or("");
    let media_type = MediaType::parse(media_type_raw)
        .ok_or_else(|| DeployError::parse(position.clone(), format!("unknown payload media-type {media_type_raw:?}")))?;

    let format = cursor.read_text_element("format")?;
    cursor.expect_end("payload")?;

    Ok(Mediator {
        kind: MediatorKind::Payload(PayloadMediator { media_type, format }),
        position,
    })
}

fn parse_variable<R: Read>(cursor: &mut Cursor<R>, hierarchy: &str) -> Result<Mediator, DeployError> {
    let attributes = cursor.expect_start("variable")?;
    let position = cursor.position_at(&format!("{hierarchy}->variable"));
    let name = attr(&attributes, "name")
        .ok_or_else(|| DeployError::parse(position.clone(), "variable mediator missing 'name' attribute"))?
        .to_string();
    let type_raw = attr(&attributes, "type").unwrap_or("");
    let var_type = VariableType::parse(type_raw)
        .ok_or_else(|| DeployError::parse(position.clone(), format!("unknown variable type {type_raw:?}")))?;
    let value = attr(&attributes, "value").unwrap_or("").to_string();

    cursor.skip_text()?;
    cursor.expect_end("variable")?;

    Ok(Mediator {
        kind: MediatorKind::Variable(VariableMediator { name, var_type, value }),
        position,
    })
}

fn parse_call<R: Read>(cursor: &mut Cursor<R>, hierarchy: &str) -> Result<Mediator, DeployError> {
    cursor.expect_start("call")?;
    let position = cursor.position_at(&format!("{hierarchy}->call"));

    let endpoint_attrs = cursor.expect_start("endpoint")?;
    let endpoint_ref = attr(&endpoint_attrs, "key")
        .ok_or_else(|| DeployError::parse(position.clone(), "call/endpoint missing 'key' attribute"))?
        .to_string();
    cursor.skip_text()?;
    cursor.expect_end("endpoint")?;
    cursor.expect_end("call")?;

    Ok(Mediator {
        kind: MediatorKind::Call(CallMediator { endpoint_ref }),
        position,
    })
}
