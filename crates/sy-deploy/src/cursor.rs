//! A one-token-lookahead cursor over an XML event stream, tracking the
//! current line for `Position` attachment.

use crate::error::DeployError;
use std::io::Read;
use sy_common::Position;
use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

pub struct Cursor<R: Read> {
    reader: EventReader<R>,
    current: Option<XmlEvent>,
    file: String,
    hierarchy: String,
}

impl<R: Read> Cursor<R> {
    pub fn new(source: R, file: impl Into<String>, hierarchy: impl Into<String>) -> Result<Self, DeployError> {
        let mut reader = ParserConfig::new()
            .trim_whitespace(true)
            .ignore_comments(true)
            .create_reader(source);
        let file = file.into();
        let first = reader
            .next()
            .map_err(|e| DeployError::parse(Position::new(file.clone(), 1, "document".to_string()), e.to_string()))?;
        let mut cursor = Cursor {
            reader,
            current: Some(first),
            file,
            hierarchy: hierarchy.into(),
        };
        cursor.skip_prologue()?;
        Ok(cursor)
    }

    fn skip_prologue(&mut self) -> Result<(), DeployError> {
        while matches!(self.current, Some(XmlEvent::StartDocument { .. })) {
            self.advance()?;
        }
        Ok(())
    }

    pub fn line(&self) -> u64 {
        self.reader.position().row + 1
    }

    pub fn position(&self) -> Position {
        Position::new(self.file.clone(), self.line(), self.hierarchy.clone())
    }

    pub fn position_at(&self, sub_hierarchy: &str) -> Position {
        Position::new(self.file.clone(), self.line(), format!("{}->{}", self.hierarchy, sub_hierarchy))
    }

    pub fn current(&self) -> Option<&XmlEvent> {
        self.current.as_ref()
    }

    pub fn advance(&mut self) -> Result<(), DeployError> {
        self.current = Some(self.reader.next().map_err(|e| DeployError::parse(self.position(), e.to_string()))?);
        Ok(())
    }

    /// Skip any whitespace/characters events that `trim_whitespace`
    /// didn't already collapse (mixed content between elements).
    pub fn skip_text(&mut self) -> Result<(), DeployError> {
        while matches!(self.current, Some(XmlEvent::Characters(_)) | Some(XmlEvent::Whitespace(_))) {
            self.advance()?;
        }
        Ok(())
    }

    /// Returns the local name and attributes if positioned at a
    /// `StartElement`, without consuming it.
    pub fn peek_start(&self) -> Option<(&str, &[OwnedAttribute])> {
        match &self.current {
            Some(XmlEvent::StartElement { name, attributes, .. }) => Some((name.local_name.as_str(), attributes.as_slice())),
            _ => None,
        }
    }

    pub fn is_end_of(&self, name: &str) -> bool {
        matches!(&self.current, Some(XmlEvent::EndElement { name: n }) if n.local_name == name)
    }

    pub fn is_end_document(&self) -> bool {
        matches!(self.current, Some(XmlEvent::EndDocument))
    }

    /// Consumes a `StartElement` matching `name`, returning its
    /// attributes. Errors if the cursor isn't positioned there.
    pub fn expect_start(&mut self, name: &str) -> Result<Vec<OwnedAttribute>, DeployError> {
        self.skip_text()?;
        match self.current.clone() {
            Some(XmlEvent::StartElement { name: n, attributes, .. }) if n.local_name == name => {
                self.advance()?;
                Ok(attributes)
            }
            other => Err(DeployError::parse(
                self.position(),
                format!("expected <{name}>, found {other:?}"),
            )),
        }
    }

    pub fn expect_end(&mut self, name: &str) -> Result<(), DeployError> {
        self.skip_text()?;
        match &self.current {
            Some(XmlEvent::EndElement { name: n }) if n.local_name == name => {
                self.advance()?;
                Ok(())
            }
            other => Err(DeployError::parse(
                self.position(),
                format!("expected </{name}>, found {other:?}"),
            )),
        }
    }

    /// Reads accumulated character data up to (but not consuming) the
    /// next element boundary.
    pub fn collect_text(&mut self) -> Result<String, DeployError> {
        let mut buf = String::new();
        loop {
            match &self.current {
                Some(XmlEvent::Characters(s)) | Some(XmlEvent::CData(s)) => {
                    buf.push_str(s);
                    self.advance()?;
                }
                Some(XmlEvent::Whitespace(_)) => {
                    self.advance()?;
                }
                _ => break,
            }
        }
        Ok(buf)
    }

    /// Parses an element of the form `<tag>text</tag>`, returning `text`.
    pub fn read_text_element(&mut self, name: &str) -> Result<String, DeployError> {
        self.expect_start(name)?;
        let text = self.collect_text()?;
        self.expect_end(name)?;
        Ok(text)
    }

    /// Skips an entire element subtree the parser doesn't recognize,
    /// starting at its `StartElement` and ending just past its matching
    /// `EndElement`.
    pub fn skip_element(&mut self) -> Result<(), DeployError> {
        let name = match self.peek_start() {
            Some((n, _)) => n.to_string(),
            None => return Ok(()),
        };
        self.advance()?;
        let mut depth = 1;
        loop {
            self.skip_text()?;
            match &self.current {
                Some(XmlEvent::StartElement { name: n, .. }) if n.local_name == name => {
                    depth += 1;
                    self.advance()?;
                }
                Some(XmlEvent::StartElement { .. }) => {
                    self.skip_element()?;
                }
                Some(XmlEvent::EndElement { name: n }) if n.local_name == name => {
                    depth -= 1;
                    self.advance()?;
                    if depth == 0 {
                        break;
                    }
                }
                Some(XmlEvent::EndDocument) | None => {
                    return Err(DeployError::parse(self.position(), format!("unexpected end of document while skipping <{name}>")));
                }
                _ => {
                    self.advance()?;
                }
            }
        }
        Ok(())
    }
}

pub fn attr<'a>(attributes: &'a [OwnedAttribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name.local_name == name)
        .map(|a| a.value.as_str())
}
