//! Parses `<sequence>` bodies — top-level named sequences under
//! `Sequences/`, and the two forms a Resource may embed: an inline
//! `<sequence>…</sequence>` wrapper, or mediators placed directly under
//! `<inSequence>`/`<faultSequence>` (backward-compat form). Both yield an
//! identical `Sequence` value.

use crate::cursor::{attr, Cursor};
use crate::error::DeployError;
use std::io::Read;
use sy_model::Sequence;

/// Parses a list of mediator elements until the cursor reaches `closing_tag`,
/// without consuming the closing tag itself.
fn parse_mediator_list<R: Read>(
    cursor: &mut Cursor<R>,
    hierarchy: &str,
    closing_tag: &str,
) -> Result<Vec<sy_model::Mediator>, DeployError> {
    let mut mediators = Vec::new();
    cursor.skip_text()?;
    while !cursor.is_end_of(closing_tag) {
        if cursor.peek_start().is_none() {
            return Err(DeployError::parse(
                cursor.position(),
                format!("expected a mediator or </{closing_tag}>"),
            ));
        }
        mediators.push(crate::mediator_parser::parse_mediator(cursor, hierarchy)?);
        cursor.skip_text()?;
    }
    Ok(mediators)
}

/// Parses a top-level `<sequence name="S">…</sequence>` file body. The
/// cursor must be positioned at the `<sequence>` start element.
pub fn parse_named_sequence<R: Read>(cursor: &mut Cursor<R>, file_hierarchy: &str) -> Result<Sequence, DeployError> {
    let attributes = cursor.expect_start("sequence")?;
    let name = attr(&attributes, "name")
        .ok_or_else(|| DeployError::parse(cursor.position(), "sequence missing 'name' attribute"))?
        .to_string();
    let hierarchy = format!("{file_hierarchy}->{name}");
    let position = cursor.position_at(&name);
    let mediators = parse_mediator_list(cursor, &hierarchy, "sequence")?;
    cursor.expect_end("sequence")?;

    Ok(Sequence {
        name: Some(name),
        mediators,
        position,
    })
}

/// Parses either embedded form of a Resource's `inSequence`/
/// `faultSequence`: mediators placed directly under the wrapper tag, or
/// a single nested `<sequence>…</sequence>` (the backward-compat and the
/// inline forms respectively).
pub fn parse_embedded_sequence<R: Read>(
    cursor: &mut Cursor<R>,
    wrapper_tag: &str,
    hierarchy: &str,
) -> Result<Sequence, DeployError> {
    let position = cursor.position_at(wrapper_tag);
    cursor.expect_start(wrapper_tag)?;
    cursor.skip_text()?;

    let mediators = if cursor.peek_start().map(|(n, _)| n) == Some("sequence") {
        let inline_hierarchy = format!("{hierarchy}->{wrapper_tag}->sequence");
        cursor.expect_start("sequence")?;
        let mediators = parse_mediator_list(cursor, &inline_hierarchy, "sequence")?;
        cursor.expect_end("sequence")?;
        mediators
    } else {
        let inline_hierarchy = format!("{hierarchy}->{wrapper_tag}");
        parse_mediator_list(cursor, &inline_hierarchy, wrapper_tag)?
    };

    cursor.expect_end(wrapper_tag)?;

    Ok(Sequence {
        name: None,
        mediators,
        position,
    })
}
