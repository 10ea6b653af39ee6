//! Error taxonomy: terminal parse errors and non-fatal issues.
//!
//! Decode-level damage never surfaces here (the codec substitutes the
//! replacement character locally); a [`ParseError`] always means a
//! structural violation, tagged with the line where the offending construct
//! began.

use alloc::string::String;

use thiserror::Error;

/// A terminal parse error.
///
/// After a `ParseError` the tokenizer's position has been restored to the
/// start of the failing scan, so the error is reproducible, but the
/// instance is no longer useful for further pulls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source} (line {line})")]
pub struct ParseError {
    pub(crate) source: SyntaxError,
    pub(crate) line: usize,
}

impl ParseError {
    /// Line (1-based) at which the offending construct began.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn syntax(&self) -> &SyntaxError {
        &self.source
    }
}

/// The structural violations the parser can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unclosed markup after '{0}'")]
    UnclosedMarkup(&'static str),

    #[error("unclosed content ({expected:?} expected)")]
    UnclosedContent { expected: String },

    #[error("unexpected character {0:?} in content")]
    UnexpectedContent(char),

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("character {ch:?} not allowed in {what}")]
    InvalidNameChar { ch: char, what: &'static str },

    #[error("empty tag name")]
    EmptyTagName,

    #[error("tag {0:?} must be closed with '>'")]
    MissingTagEnd(String),

    #[error("invalid close tag {0:?}")]
    InvalidCloseTag(String),

    #[error("duplicate attribute {0:?}")]
    DuplicateAttribute(String),

    #[error("truncated attribute value")]
    TruncatedAttributeValue,

    #[error("conditional sections are not supported")]
    ConditionalSection,

    #[error("unexpected content past end of line")]
    ExpectedEndOfLine,

    #[error("index not found")]
    MissingIndex,

    #[error("invalid character {0:?} in index")]
    InvalidIndexChar(char),

    #[error("index can't be negative")]
    NegativeIndex,

    #[error("index literal overflows")]
    IndexOverflow,
}

/// A non-fatal observation accumulated while parsing (for example a
/// truncated trailing codepoint that was substituted and tolerated).
///
/// Issues are distinct from [`ParseError`]s: the caller may report them
/// without aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub message: String,
    /// Line (1-based) where the observation was made.
    pub line: usize,
    /// Logical codepoint offset where the observation was made.
    pub offset: usize,
}

impl core::fmt::Display for Issue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} (line {}, offset {})",
            self.message, self.line, self.offset
        )
    }
}
