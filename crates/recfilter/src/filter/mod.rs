//! Filter expression parser and evaluator.
//!
//! This module provides a small filter expression language for querying
//! either a free-text string or a nested record, returning a boolean match
//! decision.
//!
//! # Supported Syntax
//!
//! ## Comparisons (record mode)
//! - `field = value`, `field != value` - structural equality
//! - `field > value`, `field < value`, `field >= value`, `field <= value` -
//!   ordering over numbers or strings
//! - `field in [a, b]`, `field !in [a, b]` - membership
//! - `field contains_any [a, b]`, `field contains_all [a, b]` - set operators
//!   over array fields
//!
//! Field names are dot-separated paths (`a.b.c`) resolved through nested
//! mappings; a missing path resolves to null rather than erroring.
//!
//! ## Values
//! - `"text"` or `'text'` - strings, no escape sequences
//! - `/pattern/i` - regex, searched as a substring; only the `i` flag is
//!   honored
//! - `[1, "a", [2]]` - arrays, nesting permitted
//! - `42`, `3.5` - numbers
//! - `true`, `false`, `null`
//!
//! ## Text terms (full-text mode)
//! A bare quoted string or regex matches against the whole input string,
//! case-insensitively for strings, with synonym expansion from the
//! evaluator's [`SynonymTable`](crate::synonyms::SynonymTable). Unquoted bare
//! words are not valid terms.
//!
//! ## Boolean Operators
//! - `and`, `or` - case-insensitive; see [`FilterParser`] for the
//!   non-standard flattening of mixed `and`/`or`
//! - `()` - grouping
//!
//! # Example
//!
//! ```
//! use recfilter_rs::filter::{FilterEvaluator, FilterInput, FilterParser};
//! use recfilter_rs::synonyms::SynonymTable;
//!
//! // Parse a filter expression once...
//! let filter = FilterParser::parse(r#"status = "open" and priority > 2"#);
//!
//! // ...and evaluate it against any number of records.
//! let evaluator = FilterEvaluator::new(SynonymTable::new());
//! let record = serde_json::json!({"status": "open", "priority": 3});
//! assert!(evaluator.check(FilterInput::Record(&record), &filter).unwrap());
//! ```

mod ast;
mod cursor;
mod error;
mod evaluator;
mod parser;

pub use ast::{CompareOp, Filter, LogicalOp, Value};
pub use error::{FilterError, FilterResult};
pub use evaluator::{FilterEvaluator, FilterInput};
pub use parser::FilterParser;
