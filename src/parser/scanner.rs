//! Depth-tracked scanner for `<?ono … ?>` directive spans.
//!
//! The scanner walks the document once per nesting level, matching each start
//! marker with its balancing end marker. Malformed input never fails a scan:
//! an unterminated start marker folds itself and everything after it into
//! trailing literal text, and an end marker with no preceding start marker is
//! ordinary text. Markers are only meaningful as a pair.

use super::node::{Node, Span};

pub const START_MARKER: &str = "<?ono";
pub const END_MARKER: &str = "?>";

/// Hard bound on directive nesting. Content nested deeper than this is no
/// longer scanned for markers and becomes literal text, which keeps
/// recursion depth bounded on adversarial input.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Scan a document into an ordered node sequence (the synthetic root).
///
/// Spans are absolute byte ranges into `text` at every nesting depth.
pub fn scan(text: &str) -> Vec<Node> {
    scan_at(text, 0, 0)
}

fn scan_at(text: &str, base: usize, depth: usize) -> Vec<Node> {
    if depth >= MAX_NESTING_DEPTH {
        if text.is_empty() {
            return Vec::new();
        }
        return vec![literal(text, base)];
    }

    let mut nodes = Vec::new();
    let mut cursor = 0;

    while cursor < text.len() {
        let Some(found) = text[cursor..].find(START_MARKER) else {
            nodes.push(literal(&text[cursor..], base + cursor));
            break;
        };
        let start = cursor + found;

        if start > cursor {
            nodes.push(literal(&text[cursor..start], base + cursor));
        }

        let Some(end) = find_matching_end(text, start) else {
            // No balancing end marker anywhere: the start marker and the
            // rest of the document degrade to literal text.
            nodes.push(literal(&text[start..], base + start));
            break;
        };

        let inner_start = start + START_MARKER.len();
        let inner = &text[inner_start..end];
        let raw_content = inner.trim();
        let leading_ws = inner.len() - inner.trim_start().len();

        let children = scan_at(
            raw_content,
            base + inner_start + leading_ws,
            depth + 1,
        );

        let span_end = end + END_MARKER.len();
        nodes.push(Node::Directive {
            raw_content: raw_content.to_string(),
            inner: inner.to_string(),
            span: Span::new(base + start, base + span_end),
            children,
        });

        cursor = span_end;
    }

    nodes
}

/// Find the end marker balancing the start marker at `start`.
///
/// Scans forward from just past the start marker: every additional start
/// marker seen before the next end marker increments a nesting counter, an
/// end marker decrements it if nonzero, and an end marker at counter zero is
/// the match. Returns the byte index of the matching end marker, or `None`
/// when the remaining text contains no balancing marker.
fn find_matching_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut cursor = start + START_MARKER.len();

    while cursor <= text.len() {
        let next_end = cursor + text[cursor..].find(END_MARKER)?;
        let next_start = text[cursor..].find(START_MARKER).map(|i| cursor + i);

        match next_start {
            Some(s) if s < next_end => {
                depth += 1;
                cursor = s + START_MARKER.len();
            }
            _ => {
                if depth == 0 {
                    return Some(next_end);
                }
                depth -= 1;
                cursor = next_end + END_MARKER.len();
            }
        }
    }

    None
}

fn literal(text: &str, base: usize) -> Node {
    Node::Literal {
        text: text.to_string(),
        span: Span::new(base, base + text.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::node::render;
    use super::*;

    fn directive_count(nodes: &[Node]) -> usize {
        nodes
            .iter()
            .map(|n| match n {
                Node::Directive { children, .. } => 1 + directive_count(children),
                Node::Literal { .. } => 0,
            })
            .sum()
    }

    fn max_depth(nodes: &[Node]) -> usize {
        nodes
            .iter()
            .map(|n| match n {
                Node::Directive { children, .. } => 1 + max_depth(children),
                Node::Literal { .. } => 0,
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_scan_plain_text() {
        let nodes = scan("no directives here");
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], Node::Literal { text, .. } if text == "no directives here"));
    }

    #[test]
    fn test_scan_empty_input() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_scan_single_directive() {
        let text = "before <?ono get temp dir ?> after";
        let nodes = scan(text);
        assert_eq!(nodes.len(), 3);
        match &nodes[1] {
            Node::Directive {
                raw_content,
                inner,
                span,
                children,
            } => {
                assert_eq!(raw_content, "get temp dir");
                assert_eq!(inner, " get temp dir ");
                assert_eq!(&text[span.start..span.end], "<?ono get temp dir ?>");
                assert!(children.is_empty());
            }
            other => panic!("expected directive, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_directive_at_document_edges() {
        let nodes = scan("<?ono x ?>");
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_directive());

        let nodes = scan("<?ono a ?><?ono b ?>");
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(Node::is_directive));
    }

    #[test]
    fn test_scan_empty_directive_body() {
        let nodes = scan("<?ono?>");
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            Node::Directive {
                raw_content, inner, ..
            } => {
                assert_eq!(raw_content, "");
                assert_eq!(inner, "");
            }
            other => panic!("expected directive, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_nested_directives() {
        let text = "blah <?ono capture this <?ono but also this ?> and keep going ?> blah";
        let nodes = scan(text);
        assert_eq!(nodes.len(), 3);
        match &nodes[1] {
            Node::Directive {
                raw_content,
                children,
                ..
            } => {
                assert_eq!(
                    raw_content,
                    "capture this <?ono but also this ?> and keep going"
                );
                let inner_directives: Vec<_> =
                    children.iter().filter(|n| n.is_directive()).collect();
                assert_eq!(inner_directives.len(), 1);
                match inner_directives[0] {
                    Node::Directive { raw_content, .. } => {
                        assert_eq!(raw_content, "but also this");
                    }
                    _ => unreachable!(),
                }
            }
            other => panic!("expected directive, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_child_spans_are_absolute() {
        let text = "a <?ono outer <?ono inner ?> tail ?> z";
        let nodes = scan(text);
        let Node::Directive { children, .. } = &nodes[1] else {
            panic!("expected directive");
        };
        let child = children.iter().find(|n| n.is_directive()).unwrap();
        let span = child.span();
        assert_eq!(&text[span.start..span.end], "<?ono inner ?>");
    }

    #[test]
    fn test_unterminated_marker_degrades_to_literal() {
        let text = "good text <?ono never closed and more text";
        let nodes = scan(text);
        assert_eq!(nodes.len(), 2);
        match &nodes[1] {
            Node::Literal { text: tail, .. } => {
                assert_eq!(tail, "<?ono never closed and more text");
            }
            other => panic!("expected trailing literal, got {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_nested_marker_degrades_outer_too() {
        // The inner start marker consumes the only end marker, leaving the
        // outer one unbalanced; everything from the outer marker is literal.
        let text = "x <?ono a <?ono b ?> tail";
        let nodes = scan(text);
        assert_eq!(directive_count(&nodes), 0);
        match nodes.last().unwrap() {
            Node::Literal { text: tail, .. } => assert_eq!(tail, "<?ono a <?ono b ?> tail"),
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn test_orphan_end_marker_is_literal() {
        let text = "just text ?> more text";
        let nodes = scan(text);
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], Node::Literal { text: t, .. } if t == text));
    }

    #[test]
    fn test_orphan_end_marker_before_directive() {
        let text = "?> then <?ono real ?>";
        let nodes = scan(text);
        assert_eq!(directive_count(&nodes), 1);
        assert!(matches!(&nodes[0], Node::Literal { text: t, .. } if t == "?> then "));
    }

    #[test]
    fn test_round_trip_is_exact() {
        let cases = [
            "",
            "plain",
            "<?ono x ?>",
            "<?ono   oddly   spaced   ?>",
            "a <?ono one ?> b <?ono two ?> c",
            "Start <?ono level1 <?ono level2a ?> middle <?ono level2b <?ono level3 ?> end2b ?> end1 ?> finish",
            "broken <?ono no end",
            "?> orphan end",
            "<?ono?>",
        ];
        for case in cases {
            assert_eq!(render(&scan(case)), case, "round trip failed for {case:?}");
        }
    }

    #[test]
    fn test_depth_bound_fails_closed() {
        let mut text = String::new();
        for _ in 0..MAX_NESTING_DEPTH + 8 {
            text.push_str("<?ono ");
        }
        text.push('x');
        for _ in 0..MAX_NESTING_DEPTH + 8 {
            text.push_str(" ?>");
        }

        let nodes = scan(&text);
        assert_eq!(max_depth(&nodes), MAX_NESTING_DEPTH);
        // Exact reassembly still holds at the bound.
        assert_eq!(render(&nodes), text);
    }
}
