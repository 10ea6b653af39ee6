//! A streaming, encoding-agnostic markup tokenizer.
//!
//! The input is an immutable, memory-resident byte slice whose encoding is
//! not known in advance. Three layers turn it into semantic events:
//!
//! - [`codec`]: BOM sniffing plus per-encoding decode/encode of Unicode
//!   scalar values (UTF-8, UTF-16LE/BE, UTF-32LE/BE);
//! - [`ParserBase`]: a line/offset-tracked codepoint cursor with exact
//!   snapshot/rewind semantics for speculative matching;
//! - [`Tokenizer`]: a pull-based state machine yielding one [`MarkupEvent`]
//!   at a time (tags, text, comments, processing instructions, special
//!   blocks) without building a document tree.
//!
//! ```
//! use xmlmodem::{AnyTokenizer, MarkupEvent};
//!
//! let mut tokenizer = AnyTokenizer::from_bytes(b"<greeting kind=\"warm\">hi</greeting>");
//! let ev = tokenizer.next_event().unwrap();
//! assert!(ev.is_open_tag("greeting"));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod any;
mod attrmap;
mod base;
pub mod codec;
mod cursor;
mod error;
mod event;
mod options;
mod tokenizer;

pub use any::AnyTokenizer;
pub use attrmap::AttrMap;
pub use base::{Context, ParserBase};
pub use codec::{Codec, Encoding, Utf8, Utf16Be, Utf16Le, Utf32Be, Utf32Le};
pub use cursor::Cursor;
pub use error::{Issue, ParseError, SyntaxError};
pub use event::MarkupEvent;
pub use options::TokenizerOptions;
pub use tokenizer::Tokenizer;
