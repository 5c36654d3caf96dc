//! Status Codec Error Types

use thiserror::Error;

/// Errors that can occur while decoding a blob or configuring extraction
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input ended in the middle of a value
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A character that starts no known production
    #[error("unexpected character `{ch}` at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// Unsupported escape sequence inside a quoted string
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    /// Numeric token that does not parse as a number
    #[error("invalid number `{text}`")]
    InvalidNumber { text: String },

    /// A bare word other than the boolean/null keywords
    #[error("unknown keyword `{word}`")]
    UnknownKeyword { word: String },

    /// Containers nested beyond the parser limit
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Data left over after the top-level value
    #[error("trailing data at offset {offset}")]
    TrailingData { offset: usize },

    /// Top level of the blob is not a list
    #[error("status blob is not a list")]
    NotAList,

    /// An event entry is not a dict
    #[error("event {index} is not a dict")]
    NotADict { index: usize },

    /// A required event field is absent
    #[error("event {index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// An event field carries a type the schema rejects
    #[error("event {index} has an invalid `{field}` field")]
    InvalidFieldType { index: usize, field: &'static str },

    /// Extractor configured with an empty signal code
    #[error("signal code must not be empty")]
    EmptySignalCode,

    /// Extractor configured with a non-positive or non-finite divisor
    #[error("scale divisor must be finite and positive, got {divisor}")]
    InvalidDivisor { divisor: f64 },
}
