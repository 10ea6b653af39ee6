//! Runtime-encoding front door over the monomorphized tokenizers.

use alloc::vec::Vec;

use crate::codec::{Encoding, Utf8, Utf16Be, Utf16Le, Utf32Be, Utf32Le};
use crate::error::{Issue, ParseError};
use crate::event::MarkupEvent;
use crate::options::TokenizerOptions;
use crate::tokenizer::Tokenizer;

/// A [`Tokenizer`] whose encoding is sniffed from the input's byte-order
/// mark rather than fixed at compile time.
///
/// The mark, when present, selects the encoding and is stripped before
/// tokenization; without one the input is treated as UTF-8. Each variant
/// wraps the statically-typed tokenizer for that encoding, so dispatch
/// costs one match per pull.
#[derive(Debug)]
pub enum AnyTokenizer<'b> {
    Utf8(Tokenizer<'b, Utf8>),
    Utf16Le(Tokenizer<'b, Utf16Le>),
    Utf16Be(Tokenizer<'b, Utf16Be>),
    Utf32Le(Tokenizer<'b, Utf32Le>),
    Utf32Be(Tokenizer<'b, Utf32Be>),
}

macro_rules! delegate {
    ($self:expr, $t:pat => $body:expr) => {
        match $self {
            AnyTokenizer::Utf8($t) => $body,
            AnyTokenizer::Utf16Le($t) => $body,
            AnyTokenizer::Utf16Be($t) => $body,
            AnyTokenizer::Utf32Le($t) => $body,
            AnyTokenizer::Utf32Be($t) => $body,
        }
    };
}

impl<'b> AnyTokenizer<'b> {
    /// Sniffs the encoding of `buf` and builds the matching tokenizer with
    /// default [`TokenizerOptions`].
    #[must_use]
    pub fn from_bytes(buf: &'b [u8]) -> Self {
        Self::with_options(buf, TokenizerOptions::default())
    }

    #[must_use]
    pub fn with_options(buf: &'b [u8], options: TokenizerOptions) -> Self {
        let (encoding, bom_len) = Encoding::detect(buf);
        let body = &buf[bom_len..];
        match encoding {
            Encoding::Utf8 => AnyTokenizer::Utf8(Tokenizer::with_options(body, options)),
            Encoding::Utf16Le => AnyTokenizer::Utf16Le(Tokenizer::with_options(body, options)),
            Encoding::Utf16Be => AnyTokenizer::Utf16Be(Tokenizer::with_options(body, options)),
            Encoding::Utf32Le => AnyTokenizer::Utf32Le(Tokenizer::with_options(body, options)),
            Encoding::Utf32Be => AnyTokenizer::Utf32Be(Tokenizer::with_options(body, options)),
        }
    }

    /// The encoding selected at construction.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        match self {
            AnyTokenizer::Utf8(_) => Encoding::Utf8,
            AnyTokenizer::Utf16Le(_) => Encoding::Utf16Le,
            AnyTokenizer::Utf16Be(_) => Encoding::Utf16Be,
            AnyTokenizer::Utf32Le(_) => Encoding::Utf32Le,
            AnyTokenizer::Utf32Be(_) => Encoding::Utf32Be,
        }
    }

    /// Pulls the next event. See [`Tokenizer::next_event`].
    ///
    /// # Errors
    ///
    /// A [`ParseError`] on a structural violation.
    pub fn next_event(&mut self) -> Result<MarkupEvent, ParseError> {
        delegate!(self, t => t.next_event())
    }

    /// Current line of the underlying parser, 1-based.
    #[must_use]
    pub fn line(&self) -> usize {
        delegate!(self, t => t.line())
    }

    #[cfg(any(test, feature = "fuzzing"))]
    /// Logical codepoint offset of the underlying parser. See
    /// [`Tokenizer::offset`].
    #[must_use]
    pub fn offset(&self) -> usize {
        delegate!(self, t => t.offset())
    }

    /// Non-fatal observations accumulated so far.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        delegate!(self, t => t.issues())
    }

    /// Drains the accumulated issues.
    pub fn take_issues(&mut self) -> Vec<Issue> {
        delegate!(self, t => t.take_issues())
    }
}

impl Iterator for AnyTokenizer<'_> {
    type Item = Result<MarkupEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        delegate!(self, t => t.next())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::codec::Codec;

    fn with_bom<E: Codec>(bom: &[u8], doc: &str) -> Vec<u8> {
        let mut bytes = bom.to_vec();
        for ch in doc.chars() {
            E::encode(ch, &mut bytes);
        }
        bytes
    }

    fn assert_tokenizes(bytes: &[u8], encoding: Encoding) {
        let mut t = AnyTokenizer::from_bytes(bytes);
        assert_eq!(t.encoding(), encoding);
        let ev = t.next_event().unwrap();
        assert!(ev.is_open_tag("greeting"));
        assert_eq!(ev.attributes().unwrap().value_of("kind"), Some("warm"));
        assert_eq!(t.next_event().unwrap().value(), Some("hi"));
        assert!(t.next_event().unwrap().is_close_tag("greeting"));
        assert!(t.next_event().unwrap().is_none());
    }

    const DOC: &str = "<greeting kind=\"warm\">hi</greeting>";

    #[test]
    fn plain_utf8_without_bom() {
        assert_tokenizes(DOC.as_bytes(), Encoding::Utf8);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let bytes = with_bom::<Utf8>(&[0xEF, 0xBB, 0xBF], DOC);
        assert_tokenizes(&bytes, Encoding::Utf8);
    }

    #[test]
    fn utf16_boms() {
        let bytes = with_bom::<Utf16Le>(&[0xFF, 0xFE], DOC);
        assert_tokenizes(&bytes, Encoding::Utf16Le);
        let bytes = with_bom::<Utf16Be>(&[0xFE, 0xFF], DOC);
        assert_tokenizes(&bytes, Encoding::Utf16Be);
    }

    #[test]
    fn utf32_boms() {
        let bytes = with_bom::<Utf32Le>(&[0xFF, 0xFE, 0x00, 0x00], DOC);
        assert_tokenizes(&bytes, Encoding::Utf32Le);
        let bytes = with_bom::<Utf32Be>(&[0x00, 0x00, 0xFE, 0xFF], DOC);
        assert_tokenizes(&bytes, Encoding::Utf32Be);
    }

    #[test]
    fn iterates_like_the_typed_tokenizer() {
        let events: Result<Vec<_>, _> = AnyTokenizer::from_bytes(DOC.as_bytes()).collect();
        assert_eq!(events.unwrap().len(), 3);
    }

    #[test]
    fn empty_input() {
        let mut t = AnyTokenizer::from_bytes(b"");
        assert!(t.next_event().unwrap().is_none());
    }
}
