//! Node tree produced by scanning a host document.

use serde::{Deserialize, Serialize};

/// Byte range into the original document, `start` inclusive, `end` exclusive.
///
/// Spans stay absolute at every nesting depth so substitution can always be
/// positional rather than content-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `other` lies entirely inside this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One parsed piece of a document: either plain text or a directive span.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Text outside any directive, kept verbatim.
    Literal { text: String, span: Span },
    /// A `<?ono … ?>` span. `inner` is the exact text between the markers;
    /// `raw_content` is `inner` with surrounding whitespace trimmed, which is
    /// what resolution operates on. `children` holds directives nested inside
    /// the trimmed content, with spans still absolute.
    Directive {
        raw_content: String,
        inner: String,
        span: Span,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Literal { span, .. } | Node::Directive { span, .. } => *span,
        }
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, Node::Directive { .. })
    }
}

/// Render a node sequence back into text.
///
/// This is the exact inverse of [`scan`](super::scan) for an unmodified tree:
/// literals keep their text and directives re-emit their markers around the
/// untrimmed inner content, so the output reproduces the input byte-for-byte.
pub fn render(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Literal { text, .. } => out.push_str(text),
            Node::Directive { inner, .. } => {
                out.push_str(super::scanner::START_MARKER);
                out.push_str(inner);
                out.push_str(super::scanner::END_MARKER);
            }
        }
    }
    out
}
