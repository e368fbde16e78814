//! Filter expression language over free text and structured records.
//!
//! This crate provides the core of a record/text filtering tool: a lenient
//! recursive descent parser producing an immutable AST, and an evaluator that
//! walks that AST against either a plain string (full-text mode) or a nested
//! JSON-like record (record mode). A serving layer is expected to sit on top:
//! it builds a [`SynonymTable`], constructs a [`FilterEvaluator`], parses
//! each incoming expression once, and checks it against one input or many
//! records.
//!
//! Parsing never fails by default; malformed input degrades to the partial
//! tree built so far ([`FilterParser::parse`]), with an opt-in strict variant
//! that reports positioned diagnostics ([`FilterParser::parse_strict`]).
//! Evaluation is pure and reentrant, and fails explicitly on type-mismatched
//! comparisons instead of coercing.

pub mod filter;
pub mod synonyms;

pub use filter::{
    CompareOp, Filter, FilterError, FilterEvaluator, FilterInput, FilterParser, FilterResult,
    LogicalOp, Value,
};
pub use synonyms::{SynonymError, SynonymResult, SynonymTable};
