use sy_common::MessageContext;
use sy_model::{MediaType, PayloadMediator};

/// Validates `format` against `media_type`; on success replaces the
/// payload and content type in place. JSON is canonicalized through
/// `serde_json::Value` (re-serializing drops insignificant whitespace);
/// XML is checked for well-formedness only — the engine carries no XML
/// object model to canonicalize into.
pub fn execute(mediator: &PayloadMediator, msg: &mut MessageContext) -> (bool, Option<String>) {
    match mediator.media_type {
        MediaType::Json => match serde_json::from_str::<serde_json::Value>(&mediator.format) {
            Ok(value) => {
                let canonical = match serde_json::to_vec(&value) {
                    Ok(bytes) => bytes,
                    Err(e) => return (false, Some(format!("failed to re-serialize JSON: {e}"))),
                };
                apply(msg, canonical, mediator.media_type);
                (true, None)
            }
            Err(e) => (false, Some(format!("invalid JSON payload: {e}"))),
        },
        MediaType::Xml => match is_well_formed_xml(&mediator.format) {
            true => {
                apply(msg, mediator.format.clone().into_bytes(), mediator.media_type);
                (true, None)
            }
            false => (false, Some("invalid XML payload: not well-formed".to_string())),
        },
    }
}

fn apply(msg: &mut MessageContext, payload: Vec<u8>, media_type: MediaType) {
    msg.payload = payload;
    msg.content_type = media_type.content_type().to_string();
    msg.headers.insert("Content-Type", media_type.content_type());
}

/// A minimal well-formedness check: every opening tag has a matching
/// close, tracked with a stack. Good enough to reject obviously broken
/// fragments without pulling in a full XML DOM for a mediator that never
/// needs to inspect the tree.
fn is_well_formed_xml(raw: &str) -> bool {
    use xml::reader::{EventReader, XmlEvent};

    let wrapped = format!("<root>{}</root>", raw);
    let reader = EventReader::new(std::io::Cursor::new(wrapped.as_bytes()));
    for event in reader {
        match event {
            Ok(XmlEvent::EndDocument) => return true,
            Ok(_) => continue,
            Err(_) => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use sy_common::MessageContext;

    #[test]
    fn valid_json_canonicalizes_and_sets_content_type() {
        let mediator = PayloadMediator {
            media_type: MediaType::Json,
            format: "{ \"a\" : 1 }".to_string(),
        };
        let mut msg = MessageContext::new();
        let (ok, err) = execute(&mediator, &mut msg);
        assert!(ok, "{err:?}");
        assert_eq!(msg.content_type, "application/json");
        assert_eq!(msg.payload, br#"{"a":1}"#);
    }

    #[test]
    fn invalid_json_fails() {
        let mediator = PayloadMediator {
            media_type: MediaType::Json,
            format: "{not json".to_string(),
        };
        let mut msg = MessageContext::new();
        let (ok, err) = execute(&mediator, &mut msg);
        assert!(!ok);
        assert!(err.is_some());
    }

    #[test]
    fn valid_xml_sets_content_type() {
        let mediator = PayloadMediator {
            media_type: MediaType::Xml,
            format: "<a><b>1</b></a>".to_string(),
        };
        let mut msg = MessageContext::new();
        let (ok, _) = execute(&mediator, &mut msg);
        assert!(ok);
        assert_eq!(msg.content_type, "application/xml");
    }

    #[test]
    fn malformed_xml_fails() {
        let mediator = PayloadMediator {
            media_type: MediaType::Xml,
            format: "<a><b>1</a>".to_string(),
        };
        let mut msg = MessageContext::new();
        let (ok, _) = execute(&mediator, &mut msg);
        assert!(!ok);
    }
}
