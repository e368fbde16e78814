//! Error types for filter parsing and evaluation.

use thiserror::Error;

use super::ast::CompareOp;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors surfaced by strict-mode parsing and by evaluation.
///
/// The lenient [`FilterParser::parse`](super::FilterParser::parse) never
/// returns these; it truncates instead. Positions are 0-indexed byte offsets
/// into the expression string.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError {
    /// An identifier was read where a field name is expected, but no
    /// comparison operator followed it.
    #[error("expected a comparison operator at position {position}")]
    ExpectedOperator {
        /// Where the operator was expected.
        position: usize,
    },

    /// A value literal was expected but could not be parsed.
    #[error("expected a value at position {position}")]
    ExpectedValue {
        /// Where the value was expected.
        position: usize,
    },

    /// A quoted string ran to the end of the input without a closing quote.
    #[error("unterminated string starting at position {position}")]
    UnterminatedString {
        /// Position of the opening quote.
        position: usize,
    },

    /// A regex literal ran to the end of the input without a closing `/`.
    #[error("unterminated regex starting at position {position}")]
    UnterminatedRegex {
        /// Position of the opening `/`.
        position: usize,
    },

    /// An array literal was not closed with `]`.
    #[error("unclosed array starting at position {position}")]
    UnclosedArray {
        /// Position of the opening `[`.
        position: usize,
    },

    /// A parenthesized sub-expression was not closed with `)`.
    #[error("unclosed parenthesis opened at position {position}")]
    UnclosedParenthesis {
        /// Position of the opening `(`.
        position: usize,
    },

    /// A numeric character run did not form a valid number.
    #[error("malformed number {literal:?} at position {position}")]
    MalformedNumber {
        /// Position of the first character of the run.
        position: usize,
        /// The consumed character run.
        literal: String,
    },

    /// Input remained after the expression ended.
    #[error("unexpected trailing input at position {position}")]
    TrailingInput {
        /// Position of the first unconsumed character.
        position: usize,
    },

    /// An operator was applied to operands of incompatible kinds.
    #[error("cannot apply {op} to {left} and {right}")]
    TypeMismatch {
        /// The operator's surface spelling.
        op: &'static str,
        /// Kind of the resolved field value.
        left: &'static str,
        /// Kind of the literal operand.
        right: &'static str,
    },

    /// A text term's value is neither a string nor a regex.
    #[error("text terms require a string or regex value, found {kind}")]
    InvalidTextValue {
        /// Kind of the offending value.
        kind: &'static str,
    },

    /// A regex literal failed to compile at evaluation time.
    #[error("invalid regex {pattern:?}: {message}")]
    InvalidRegex {
        /// The pattern as written in the expression.
        pattern: String,
        /// The compiler's error message.
        message: String,
    },
}

impl FilterError {
    /// Creates a type mismatch error for the given operator and operand kinds.
    pub fn type_mismatch(op: CompareOp, left: &'static str, right: &'static str) -> Self {
        FilterError::TypeMismatch {
            op: op.symbol(),
            left,
            right,
        }
    }

    /// Creates an invalid regex error from a compile failure.
    pub fn invalid_regex(pattern: impl Into<String>, err: &regex::Error) -> Self {
        FilterError::InvalidRegex {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }
}
