//! # Ono
//!
//! A universal templating preprocessor that uses AI to solve those annoying
//! cross-platform, language-specific problems you don't want to think about.
//!
//! ## Usage
//!
//! ```bash
//! ono deploy.ono.py [--context notes.yaml] [--format python] [--output deploy.py]
//! ```
//!
//! ## Modules
//!
//! - `parser` - Scanner and span extractor for nested directive markers
//! - `context` - Named key-value scopes consulted during resolution
//! - `resolve` - Concept pass turning directive text into canonical intent
//! - `render` - Syntax pass turning canonical intent into target-format text
//! - `assemble` - Span-based document reassembly
//! - `pipeline` - Per-document orchestration with bounded concurrency
//! - `llm` - Client for the external generation service
//! - `formats` - Per-format escaping, shaping, and validation strategies
//! - `config` - Global and project configuration with precedence
//! - `discovery` - File, directory, and glob input expansion
//! - `metadata` - Build identity stamped into generated output
//! - `testing` - Testing utilities and mocks
pub mod assemble;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod formats;
pub mod llm;
pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod resolve;

pub mod testing;

pub use error::{Error, Result};
