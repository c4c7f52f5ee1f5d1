//! Span-based document reassembly.
//!
//! Substitution happens strictly by original byte span, never by searching
//! for matching text. Two directives with identical raw content therefore
//! always land at their own locations. Spans are applied rightmost first so
//! earlier substitutions cannot shift the offsets of spans not yet applied.

use tracing::trace;

use crate::parser::Span;

/// Substitute each span of `original` with its rendered text.
///
/// A span nested inside another span in the list is skipped; the covering
/// span's text already accounts for the whole region.
pub fn assemble(original: &str, resolved: &[(Span, String)]) -> String {
    let mut result = original.to_string();
    for (span, text) in outermost(resolved).into_iter().rev() {
        trace!(start = span.start, end = span.end, "substituting span");
        result.replace_range(span.start..span.end, text);
    }
    result
}

/// The subset of spans not contained in any other span, ordered by start
/// offset ascending.
fn outermost(resolved: &[(Span, String)]) -> Vec<(Span, &String)> {
    let mut sorted: Vec<_> = resolved.iter().map(|(s, t)| (*s, t)).collect();
    sorted.sort_by_key(|(span, _)| (span.start, std::cmp::Reverse(span.end)));

    let mut kept: Vec<(Span, &String)> = Vec::with_capacity(sorted.len());
    let mut covered_end = 0;
    for (span, text) in sorted {
        if span.start >= covered_end {
            covered_end = span.end;
            kept.push((span, text));
        }
    }
    kept
}
