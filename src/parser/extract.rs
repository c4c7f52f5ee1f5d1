//! Flattening of a scanned node tree into an ordered directive list.

use serde::{Deserialize, Serialize};

use super::node::{Node, Span};

/// Identifier of one directive within a single processing run: its index in
/// the extraction vector. Ids are stable for the lifetime of the run and are
/// never reused across documents.
pub type DirectiveId = usize;

/// One directive span lifted out of the node tree.
///
/// Records are emitted depth-first, parent before child, in document order.
/// `depth` and `source_span` give callers everything needed to pick their own
/// resolution order; `parent`/`children` carry the structural linkage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveRecord {
    pub id: DirectiveId,
    pub raw_content: String,
    pub depth: usize,
    pub source_span: Span,
    pub parent: Option<DirectiveId>,
    pub children: Vec<DirectiveId>,
}

impl DirectiveRecord {
    /// True for outermost directives, the ones whose spans are substituted
    /// during assembly.
    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }
}

/// Flatten a scanned tree into directive records.
///
/// Pure and deterministic: same tree in, same records out, no I/O.
pub fn extract(nodes: &[Node]) -> Vec<DirectiveRecord> {
    let mut records = Vec::new();
    visit(nodes, 0, None, &mut records);
    records
}

fn visit(
    nodes: &[Node],
    depth: usize,
    parent: Option<DirectiveId>,
    records: &mut Vec<DirectiveRecord>,
) {
    for node in nodes {
        if let Node::Directive {
            raw_content,
            span,
            children,
            ..
        } = node
        {
            let id = records.len();
            records.push(DirectiveRecord {
                id,
                raw_content: raw_content.clone(),
                depth,
                source_span: *span,
                parent,
                children: Vec::new(),
            });
            if let Some(parent_id) = parent {
                records[parent_id].children.push(id);
            }
            visit(children, depth + 1, Some(id), records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::scanner::scan;
    use super::*;

    #[test]
    fn test_extract_empty() {
        assert!(extract(&scan("no directives")).is_empty());
        assert!(extract(&scan("")).is_empty());
    }

    #[test]
    fn test_extract_single() {
        let records = extract(&scan("a <?ono thing ?> b"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].raw_content, "thing");
        assert_eq!(records[0].depth, 0);
        assert!(records[0].parent.is_none());
        assert!(records[0].children.is_empty());
    }

    #[test]
    fn test_extract_nesting_structure() {
        let text = "Start <?ono level1 <?ono level2a ?> middle <?ono level2b <?ono level3 ?> end2b ?> end1 ?> finish";
        let records = extract(&scan(text));

        assert_eq!(records.len(), 4);

        // Pre-order: parent before child, document order among siblings.
        assert!(records[0].raw_content.starts_with("level1"));
        assert_eq!(records[1].raw_content, "level2a");
        assert!(records[2].raw_content.starts_with("level2b"));
        assert_eq!(records[3].raw_content, "level3");

        assert_eq!(records[0].depth, 0);
        assert_eq!(records[1].depth, 1);
        assert_eq!(records[2].depth, 1);
        assert_eq!(records[3].depth, 2);

        // The outermost directive has two direct children and one grandchild.
        assert_eq!(records[0].children, vec![1, 2]);
        assert_eq!(records[1].children, Vec::<DirectiveId>::new());
        assert_eq!(records[2].children, vec![3]);

        assert_eq!(records[1].parent, Some(0));
        assert_eq!(records[2].parent, Some(0));
        assert_eq!(records[3].parent, Some(2));
    }

    #[test]
    fn test_extract_spans_slice_original_text() {
        let text = "x <?ono outer <?ono inner ?> t ?> y <?ono solo ?>";
        let records = extract(&scan(text));
        assert_eq!(records.len(), 3);

        for record in &records {
            let slice = &text[record.source_span.start..record.source_span.end];
            assert!(slice.starts_with("<?ono"), "bad span for {record:?}");
            assert!(slice.ends_with("?>"), "bad span for {record:?}");
        }
        assert_eq!(
            &text[records[1].source_span.start..records[1].source_span.end],
            "<?ono inner ?>"
        );
    }

    #[test]
    fn test_extract_sibling_order_is_document_order() {
        let records = extract(&scan("<?ono one ?> <?ono two ?> <?ono three ?>"));
        let contents: Vec<_> = records.iter().map(|r| r.raw_content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert!(records.iter().all(DirectiveRecord::is_top_level));
        assert!(records
            .windows(2)
            .all(|w| w[0].source_span.start < w[1].source_span.start));
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "a <?ono p <?ono q ?> ?> b";
        assert_eq!(extract(&scan(text)), extract(&scan(text)));
    }
}
