//! Diagram-type registry.
//!
//! Mermaid source starts with a header line naming the kind of diagram it
//! describes. This module holds the closed set of keywords that are accepted
//! as the first token of that line, and the direction codes accepted after a
//! `graph` or `flowchart` keyword.
//!
//! Matching is case-sensitive and exact: `Graph` and `sequencediagram` are not
//! recognized.

use std::{fmt, str::FromStr};

/// Prefix that marks a whole line as a comment.
pub const COMMENT_MARKER: &str = "%%";

/// Byte-order mark some editors write at the start of a text file.
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Returns `source` without a leading byte-order mark.
pub fn strip_bom(source: &str) -> &str {
    source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source)
}

/// Returns `true` if the (untrimmed) line is a comment line.
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_MARKER)
}

/// A recognized diagram type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Graph,
    Flowchart,
    Sequence,
    Class,
    State,
    StateV2,
    EntityRelationship,
    Journey,
    Gantt,
    Pie,
    GitGraph,
    QuadrantChart,
    Requirement,
    Mindmap,
    Timeline,
    C4Context,
}

impl DiagramKind {
    /// All recognized kinds, in registry order.
    pub const ALL: [DiagramKind; 16] = [
        DiagramKind::Graph,
        DiagramKind::Flowchart,
        DiagramKind::Sequence,
        DiagramKind::Class,
        DiagramKind::State,
        DiagramKind::StateV2,
        DiagramKind::EntityRelationship,
        DiagramKind::Journey,
        DiagramKind::Gantt,
        DiagramKind::Pie,
        DiagramKind::GitGraph,
        DiagramKind::QuadrantChart,
        DiagramKind::Requirement,
        DiagramKind::Mindmap,
        DiagramKind::Timeline,
        DiagramKind::C4Context,
    ];

    /// Looks up the kind for a header keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// use mermaid_studio_core::diagram::DiagramKind;
    ///
    /// assert_eq!(DiagramKind::from_keyword("gantt"), Some(DiagramKind::Gantt));
    /// assert_eq!(DiagramKind::from_keyword("Gantt"), None);
    /// ```
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// The keyword that introduces this kind of diagram.
    pub fn keyword(self) -> &'static str {
        match self {
            DiagramKind::Graph => "graph",
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequenceDiagram",
            DiagramKind::Class => "classDiagram",
            DiagramKind::State => "stateDiagram",
            DiagramKind::StateV2 => "stateDiagram-v2",
            DiagramKind::EntityRelationship => "erDiagram",
            DiagramKind::Journey => "journey",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Pie => "pie",
            DiagramKind::GitGraph => "gitGraph",
            DiagramKind::QuadrantChart => "quadrantChart",
            DiagramKind::Requirement => "requirementDiagram",
            DiagramKind::Mindmap => "mindmap",
            DiagramKind::Timeline => "timeline",
            DiagramKind::C4Context => "C4Context",
        }
    }

    /// Returns `true` for kinds whose header may carry a [`Direction`].
    pub fn takes_direction(self) -> bool {
        matches!(self, DiagramKind::Graph | DiagramKind::Flowchart)
    }

    /// Iterator over all recognized keywords, in registry order.
    pub fn keywords() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(DiagramKind::keyword)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Layout direction of a `graph` or `flowchart` diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Top down (`TD`)
    TopDown,
    /// Top to bottom (`TB`)
    TopToBottom,
    /// Bottom to top (`BT`)
    BottomToTop,
    /// Right to left (`RL`)
    RightToLeft,
    /// Left to right (`LR`)
    LeftToRight,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::TopDown,
        Direction::TopToBottom,
        Direction::BottomToTop,
        Direction::RightToLeft,
        Direction::LeftToRight,
    ];

    /// The two-letter code used in source text.
    pub fn code(self) -> &'static str {
        match self {
            Direction::TopDown => "TD",
            Direction::TopToBottom => "TB",
            Direction::BottomToTop => "BT",
            Direction::RightToLeft => "RL",
            Direction::LeftToRight => "LR",
        }
    }

    /// Iterator over all direction codes.
    pub fn codes() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Direction::code)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.code() == s)
            .ok_or_else(|| format!("invalid direction `{s}`"))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_roundtrip() {
        for kind in DiagramKind::ALL {
            assert_eq!(DiagramKind::from_keyword(kind.keyword()), Some(kind));
        }
    }

    #[test]
    fn test_keyword_lookup_is_case_sensitive() {
        assert_eq!(DiagramKind::from_keyword("graph"), Some(DiagramKind::Graph));
        assert_eq!(DiagramKind::from_keyword("GRAPH"), None);
        assert_eq!(DiagramKind::from_keyword("sequencediagram"), None);
        assert_eq!(DiagramKind::from_keyword(""), None);
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{FEFF}graph TD"), "graph TD");
        assert_eq!(strip_bom("graph TD"), "graph TD");
        assert_eq!(strip_bom("graph\u{FEFF}"), "graph\u{FEFF}");
    }

    #[test]
    fn test_takes_direction() {
        assert!(DiagramKind::Graph.takes_direction());
        assert!(DiagramKind::Flowchart.takes_direction());
        assert!(!DiagramKind::Sequence.takes_direction());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("LR".parse::<Direction>(), Ok(Direction::LeftToRight));
        assert_eq!("TD".parse::<Direction>(), Ok(Direction::TopDown));
        assert!("lr".parse::<Direction>().is_err());
        assert!("XY".parse::<Direction>().is_err());
    }

    #[test]
    fn test_is_comment() {
        assert!(is_comment("%% note"));
        assert!(is_comment("    %%indented"));
        assert!(!is_comment("graph TD %% trailing"));
        assert!(!is_comment("% single"));
    }
}
