//! Line-oriented structural validation of Mermaid source.
//!
//! The validator is not a parser. It locates the header line, checks its
//! diagram keyword (and direction, for flowcharts), then runs four count-based
//! balance checks on every non-comment line. The balance checks compare raw
//! character counts per line; they do not track nesting or order, so `][` is
//! accepted.

use log::trace;

use mermaid_studio_core::diagram::{self, DiagramKind, Direction};

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode};

/// Number of keywords listed as examples in an unknown-type diagnostic.
const KEYWORD_EXAMPLES: usize = 5;

/// A paired-character rule checked on every line.
struct BalanceRule {
    open: char,
    close: char,
    code: ErrorCode,
    message: &'static str,
    help: &'static str,
}

/// Pair rules in reporting order. Quotes are handled separately.
const PAIR_RULES: [BalanceRule; 3] = [
    BalanceRule {
        open: '[',
        close: ']',
        code: ErrorCode::E200,
        message: "unmatched brackets [ ]",
        help: "make sure each \"[\" has a matching \"]\"",
    },
    BalanceRule {
        open: '(',
        close: ')',
        code: ErrorCode::E201,
        message: "unmatched parentheses ( )",
        help: "make sure each \"(\" has a matching \")\"",
    },
    BalanceRule {
        open: '{',
        close: '}',
        code: ErrorCode::E202,
        message: "unmatched braces { }",
        help: "make sure each \"{\" has a matching \"}\"",
    },
];

/// Validate diagram source and return every finding in line order.
///
/// Validation never fails; an empty result means no structural issue was
/// found. Identical input always yields identical output.
///
/// # Examples
///
/// ```
/// use mermaid_studio_syntax::validate;
///
/// assert!(validate("graph TD\n  A[Start] --> B[End]").is_empty());
///
/// let diagnostics = validate("graph XY\n  A[Start --> B");
/// assert_eq!(diagnostics.len(), 2);
/// assert_eq!(diagnostics[0].line(), 1);
/// assert_eq!(diagnostics[1].line(), 2);
/// ```
pub fn validate(source: &str) -> Vec<Diagnostic> {
    let mut collector = DiagnosticCollector::new();
    run_rules(source, &mut collector);
    let diagnostics = collector.into_diagnostics();
    trace!(count = diagnostics.len(); "Validated diagram source");
    diagnostics
}

fn run_rules(source: &str, collector: &mut DiagnosticCollector) {
    let source = diagram::strip_bom(source);
    if source.trim().is_empty() {
        collector.emit(
            Diagnostic::error(1, "diagram code is empty")
                .with_code(ErrorCode::E001)
                .with_help("start with a diagram type like \"graph TD\" or \"sequenceDiagram\""),
        );
        return;
    }

    let lines: Vec<&str> = source.split('\n').collect();

    let Some((header_index, header)) = lines
        .iter()
        .map(|line| line.trim())
        .enumerate()
        .find(|(_, line)| !line.is_empty() && !line.starts_with(diagram::COMMENT_MARKER))
    else {
        collector.emit(
            Diagnostic::error(1, "no diagram code found, only comments")
                .with_code(ErrorCode::E002)
                .with_help("add a diagram type line such as \"graph TD\" below the comments"),
        );
        return;
    };

    check_header(header_index + 1, header, collector);

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(diagram::COMMENT_MARKER) {
            continue;
        }
        check_balance(index + 1, line, collector);
    }
}

fn check_header(line_number: usize, header: &str, collector: &mut DiagnosticCollector) {
    let keyword = header
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();

    let Some(kind) = DiagramKind::from_keyword(keyword) else {
        let examples = DiagramKind::keywords()
            .take(KEYWORD_EXAMPLES)
            .collect::<Vec<_>>()
            .join(", ");
        collector.emit(
            Diagnostic::error(
                line_number,
                format!("invalid diagram type \"{keyword}\", expected one of: {examples}, etc."),
            )
            .with_code(ErrorCode::E100)
            .with_help("the first non-comment line must start with a diagram type keyword"),
        );
        return;
    };

    if !kind.takes_direction() {
        return;
    }

    if let Some(direction) = header.split_whitespace().nth(1) {
        if direction.parse::<Direction>().is_err() {
            let codes = Direction::codes().collect::<Vec<_>>().join(", ");
            collector.emit(
                Diagnostic::error(line_number, format!("invalid graph direction \"{direction}\""))
                    .with_code(ErrorCode::E101)
                    .with_help(format!("use one of: {codes}")),
            );
        }
    }
}

fn check_balance(line_number: usize, line: &str, collector: &mut DiagnosticCollector) {
    for rule in &PAIR_RULES {
        if count(line, rule.open) != count(line, rule.close) {
            collector.emit(
                Diagnostic::error(line_number, rule.message)
                    .with_code(rule.code)
                    .with_help(rule.help),
            );
        }
    }

    if count(line, '"') % 2 != 0 {
        collector.emit(
            Diagnostic::error(line_number, "unclosed quote \"")
                .with_code(ErrorCode::E203)
                .with_help("strings must be enclosed in matching quotes"),
        );
    }
}

fn count(line: &str, needle: char) -> usize {
    line.chars().filter(|&c| c == needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(source: &str) -> Vec<(usize, ErrorCode)> {
        validate(source)
            .iter()
            .map(|d| (d.line(), d.code().unwrap()))
            .collect()
    }

    #[test]
    fn test_empty_and_blank_sources() {
        for source in ["", "   \n", "\n\n\t"] {
            let diagnostics = validate(source);
            assert_eq!(diagnostics.len(), 1, "source {source:?}");
            assert_eq!(diagnostics[0].line(), 1);
            assert!(diagnostics[0].severity().is_error());
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E001));
        }
    }

    #[test]
    fn test_leading_byte_order_mark_is_ignored() {
        assert!(validate("\u{FEFF}graph TD\n  A --> B").is_empty());
        assert!(validate("\u{FEFF}%% note\nsequenceDiagram").is_empty());
        assert_eq!(codes("\u{FEFF}"), [(1, ErrorCode::E001)]);
        assert_eq!(codes("\u{FEFF}graph TD\n  A[x"), [(2, ErrorCode::E200)]);
    }

    #[test]
    fn test_comments_only() {
        let diagnostics = validate("%% title\n\n   %% another [ unbalanced");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_valid_flowchart() {
        let source = "graph TD\n    A[Start] --> B{Is it mobile?}\n    B -- Yes --> C[\"Quoted\"]";
        assert!(validate(source).is_empty());
    }

    #[test]
    fn test_every_keyword_is_accepted() {
        for keyword in DiagramKind::keywords() {
            assert!(validate(keyword).is_empty(), "keyword {keyword}");
        }
    }

    #[test]
    fn test_unknown_keyword_on_header_line() {
        let source = "%% leading comment\n\nflowchat LR\n  A --> B";
        let diagnostics = validate(source);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line(), 3);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E100));
        assert!(diagnostics[0].message().contains("\"flowchat\""));
        assert!(
            diagnostics[0]
                .message()
                .contains("graph, flowchart, sequenceDiagram, classDiagram, stateDiagram")
        );
    }

    #[test]
    fn test_keyword_is_split_on_parenthesis() {
        // `pie(` yields the keyword `pie`; the parenthesis imbalance is reported separately
        assert_eq!(codes("pie(title"), vec![(1, ErrorCode::E201)]);
    }

    #[test]
    fn test_keyword_is_case_sensitive() {
        assert_eq!(codes("Graph TD"), vec![(1, ErrorCode::E100)]);
    }

    #[test]
    fn test_invalid_direction() {
        let diagnostics = validate("flowchart XY\n  A --> B");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E101));
        assert!(diagnostics[0].message().contains("\"XY\""));
        assert_eq!(diagnostics[0].help(), Some("use one of: TD, TB, BT, RL, LR"));
    }

    #[test]
    fn test_direction_is_optional() {
        assert!(validate("graph\n  A --> B").is_empty());
    }

    #[test]
    fn test_direction_only_checked_for_flowcharts() {
        assert!(validate("sequenceDiagram XY").is_empty());
    }

    #[test]
    fn test_each_imbalance_reported_separately_in_fixed_order() {
        let source = "graph TD\n  A[\"x( --> B{";
        assert_eq!(
            codes(source),
            vec![
                (2, ErrorCode::E200),
                (2, ErrorCode::E201),
                (2, ErrorCode::E202),
                (2, ErrorCode::E203),
            ]
        );
    }

    #[test]
    fn test_count_heuristic_ignores_order() {
        assert!(validate("graph TD\n  A ][ B").is_empty());
        assert_eq!(codes("graph TD\n  A[)"), vec![(2, ErrorCode::E200), (2, ErrorCode::E201)]);
    }

    #[test]
    fn test_balance_is_per_line() {
        let source = "graph TD\n  A[Start\n  ] --> B";
        assert_eq!(codes(source), vec![(2, ErrorCode::E200), (3, ErrorCode::E200)]);
    }

    #[test]
    fn test_comment_lines_skip_balance_checks() {
        assert!(validate("graph TD\n  %% A[ unbalanced\n  A --> B").is_empty());
    }

    #[test]
    fn test_header_and_balance_are_independent() {
        let source = "nope [\n  A --> B(";
        assert_eq!(
            codes(source),
            vec![
                (1, ErrorCode::E100),
                (1, ErrorCode::E200),
                (2, ErrorCode::E201),
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert!(validate("graph LR\r\n  A[Start] --> B\r\n").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let source = "graph QQ\n  A[ --> B\"\n%% c\n  C{";
        assert_eq!(validate(source), validate(source));
    }
}
