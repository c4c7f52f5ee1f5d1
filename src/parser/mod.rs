//! Directive scanning, node tree, and span extraction.
//!
//! This is the structural half of the preprocessor: it turns raw text into a
//! nesting-aware tree of literal and directive spans and flattens that tree
//! into an ordered record list for resolution. Scanning never fails, since
//! malformed marker syntax degrades into literal text, and re-rendering an
//! unmodified tree reproduces the input exactly.

pub mod extract;
pub mod node;
pub mod scanner;

pub use extract::{extract, DirectiveId, DirectiveRecord};
pub use node::{render, Node, Span};
pub use scanner::{scan, END_MARKER, MAX_NESTING_DEPTH, START_MARKER};
