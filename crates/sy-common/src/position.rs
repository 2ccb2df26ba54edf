//! Diagnostic position attached to every parsed artifact and mediator.

use std::fmt;

/// `{file, line, hierarchy}` — immutable once attached at parse time.
///
/// `hierarchy` is a `->`-joined path like `TestAPI->/res->inSequence->log`
/// identifying where in the artifact tree this element lives, independent
/// of the file/line it happened to be written on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: String,
    pub line: u64,
    pub hierarchy: String,
}

impl Position {
    pub fn new(file: impl Into<String>, line: u64, hierarchy: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            hierarchy: hierarchy.into(),
        }
    }

    /// Build a child position by appending one hierarchy segment.
    pub fn child(&self, line: u64, segment: &str) -> Self {
        Self {
            file: self.file.clone(),
            line,
            hierarchy: format!("{}->{}", self.hierarchy, segment),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.hierarchy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_expected_shape() {
        let root = Position::new("TestAPI.xml", 3, "TestAPI");
        let res = root.child(4, "/res");
        let seq = res.child(5, "inSequence");
        let log = seq.child(6, "log");
        assert_eq!(log.hierarchy, "TestAPI->/res->inSequence->log");
        assert_eq!(format!("{}", log), "TestAPI.xml:6: TestAPI->/res->inSequence->log");
    }
}
