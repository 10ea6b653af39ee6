//! The pull-based markup tokenizer.
//!
//! Each call to [`Tokenizer::next_event`] consumes exactly one construct
//! from the input and yields one [`MarkupEvent`], with one exception: a
//! self-closing tag (`<tag/>`) yields its [`MarkupEvent::OpenTag`]
//! immediately and holds the matching [`MarkupEvent::CloseTag`] for the
//! next call, so consumers see the same open/close pairing as for
//! `<tag></tag>`.
//!
//! No document tree is built and no well-formedness beyond the single
//! construct is enforced; nesting discipline is the consumer's business.

use alloc::string::String;

use crate::attrmap::AttrMap;
use crate::base::ParserBase;
use crate::codec::Codec;
use crate::error::{Issue, ParseError, SyntaxError};
use crate::event::MarkupEvent;
use crate::options::TokenizerOptions;

/// Pulls [`MarkupEvent`]s out of a byte buffer in the fixed encoding `E`.
///
/// For input whose encoding is only known at runtime, use
/// [`crate::AnyTokenizer`], which sniffs the byte-order mark and dispatches
/// to a `Tokenizer` of the detected encoding.
///
/// Errors are terminal: after an `Err` the tokenizer should be dropped.
/// Every error carries the line on which the offending construct began,
/// not the line where scanning stopped.
#[derive(Debug)]
pub struct Tokenizer<'b, E: Codec> {
    base: ParserBase<'b, E>,
    options: TokenizerOptions,
    pending_close: Option<String>,
    done: bool,
}

fn at_line(err: ParseError, line: usize) -> ParseError {
    ParseError {
        source: err.source,
        line,
    }
}

fn is_name_terminator(ch: char) -> bool {
    ch == '>' || ch == '/' || ch == '='
}

fn is_invalid_name_char(ch: char) -> bool {
    ch.is_ascii_punctuation() && !matches!(ch, '-' | ':')
}

impl<'b, E: Codec> Tokenizer<'b, E> {
    /// Creates a tokenizer with default [`TokenizerOptions`].
    ///
    /// `buf` must not start with a byte-order mark.
    #[must_use]
    pub fn new(buf: &'b [u8]) -> Self {
        Self::with_options(buf, TokenizerOptions::default())
    }

    #[must_use]
    pub fn with_options(buf: &'b [u8], options: TokenizerOptions) -> Self {
        Self {
            base: ParserBase::new(buf),
            options,
            pending_close: None,
            done: false,
        }
    }

    /// Current line of the underlying parser, 1-based.
    #[must_use]
    pub fn line(&self) -> usize {
        self.base.line()
    }

    #[cfg(any(test, feature = "fuzzing"))]
    /// Logical codepoint offset of the underlying parser.
    ///
    /// Exposed only to test and fuzz builds, which assert forward progress
    /// between events to catch scan loops that stop consuming.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.base.offset()
    }

    /// Non-fatal observations accumulated so far.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        self.base.issues()
    }

    /// Drains the accumulated issues.
    pub fn take_issues(&mut self) -> alloc::vec::Vec<Issue> {
        self.base.take_issues()
    }

    /// Pulls the next event.
    ///
    /// Returns [`MarkupEvent::None`] at the end of the input, idempotently.
    ///
    /// # Errors
    ///
    /// A [`ParseError`] on a structural violation, tagged with the line
    /// where the failing construct began.
    pub fn next_event(&mut self) -> Result<MarkupEvent, ParseError> {
        if let Some(name) = self.pending_close.take() {
            return Ok(MarkupEvent::CloseTag(name));
        }
        loop {
            self.base.skip_any_space();
            if !self.base.has_data() {
                return Ok(MarkupEvent::None);
            }
            let start_line = self.base.line();
            if self.base.eat('<') {
                if let Some(event) = self.markup(start_line)? {
                    return Ok(event);
                }
            } else if let Some(event) = self.text() {
                return Ok(event);
            }
            // Construct scanned but suppressed by options; pull again.
        }
    }

    /// A text section, from the current (non-space) codepoint to the next
    /// `<` or the end of the input. Trailing whitespace is trimmed; leading
    /// whitespace was already skipped by the event loop.
    fn text(&mut self) -> Option<MarkupEvent> {
        let wanted = self.options.text_events;
        let mut text = String::new();
        while self.base.has_data() && self.base.curr() != '<' {
            if wanted {
                text.push(self.base.curr());
            }
            self.base.get_next();
        }
        if !wanted {
            return None;
        }
        text.truncate(text.trim_end().len());
        Some(MarkupEvent::Text(text))
    }

    /// Dispatches on the codepoint after `<`.
    fn markup(&mut self, start_line: usize) -> Result<Option<MarkupEvent>, ParseError> {
        if !self.base.has_data() {
            return Err(self.err(SyntaxError::UnclosedMarkup("<"), start_line));
        }
        if self.base.eat('!') {
            return self.declaration(start_line);
        }
        if self.base.eat('?') {
            let body = self
                .base
                .collect_until_seq("?>")
                .map_err(|e| at_line(e, start_line))?;
            return Ok(Some(MarkupEvent::ProcInstr(body)));
        }
        if self.base.eat('/') {
            return self.close_tag(start_line).map(Some);
        }
        self.open_tag(start_line).map(Some)
    }

    /// `<!...`: comment, CDATA section, or an unparsed special block such
    /// as a DOCTYPE. Conditional sections (`<![` not followed by `CDATA[`)
    /// are rejected.
    fn declaration(&mut self, start_line: usize) -> Result<Option<MarkupEvent>, ParseError> {
        if self.base.eat_seq("--") {
            self.base.skip_any_space();
            if self.options.comment_events {
                let mut body = self
                    .base
                    .collect_until_seq("-->")
                    .map_err(|e| at_line(e, start_line))?;
                body.truncate(body.trim_end().len());
                return Ok(Some(MarkupEvent::Comment(body)));
            }
            self.base
                .skip_until_seq("-->")
                .map_err(|e| at_line(e, start_line))?;
            return Ok(None);
        }
        if self.base.eat('[') {
            if self.base.eat_seq("CDATA[") {
                // CDATA content is verbatim, whitespace included.
                if self.options.text_events {
                    let body = self
                        .base
                        .collect_until_seq("]]>")
                        .map_err(|e| at_line(e, start_line))?;
                    return Ok(Some(MarkupEvent::Text(body)));
                }
                self.base
                    .skip_until_seq("]]>")
                    .map_err(|e| at_line(e, start_line))?;
                return Ok(None);
            }
            return Err(self.err(SyntaxError::ConditionalSection, start_line));
        }
        let body = self
            .base
            .collect_until(|c| c == '>', |c| c == '<')
            .map_err(|e| {
                let source = match e.source {
                    SyntaxError::UnexpectedEndOfInput => SyntaxError::UnclosedMarkup("<!"),
                    other => other,
                };
                ParseError {
                    source,
                    line: start_line,
                }
            })?;
        Ok(Some(MarkupEvent::SpecialBlock(body)))
    }

    fn close_tag(&mut self, start_line: usize) -> Result<MarkupEvent, ParseError> {
        let name = self.extract_name("close tag name", start_line)?;
        if name.is_empty() {
            return Err(self.err(SyntaxError::EmptyTagName, start_line));
        }
        self.base.skip_any_space();
        if !self.base.eat('>') {
            return Err(self.err(SyntaxError::InvalidCloseTag(name), start_line));
        }
        Ok(MarkupEvent::CloseTag(name))
    }

    fn open_tag(&mut self, start_line: usize) -> Result<MarkupEvent, ParseError> {
        let name = self.extract_name("tag name", start_line)?;
        if name.is_empty() {
            return Err(self.err(SyntaxError::EmptyTagName, start_line));
        }
        let mut attributes = AttrMap::new();
        loop {
            self.base.skip_any_space();
            if !self.base.has_data() {
                return Err(self.err(SyntaxError::MissingTagEnd(name), start_line));
            }
            if self.base.eat('/') {
                if self.base.eat('>') {
                    // Defer the synthesized close to the next pull.
                    self.pending_close = Some(name.clone());
                    return Ok(MarkupEvent::OpenTag { name, attributes });
                }
                return Err(self.err(SyntaxError::MissingTagEnd(name), start_line));
            }
            if self.base.eat('>') {
                return Ok(MarkupEvent::OpenTag { name, attributes });
            }
            let attr = self.extract_name("attribute name", start_line)?;
            if attr.is_empty() {
                return Err(self.err(
                    SyntaxError::InvalidNameChar {
                        ch: self.base.curr(),
                        what: "attribute name",
                    },
                    start_line,
                ));
            }
            self.base.skip_any_space();
            let value = if self.base.eat('=') {
                self.base.skip_any_space();
                Some(self.attr_value(start_line)?)
            } else {
                None
            };
            if let Err(duplicate) = attributes.insert_unique(attr, value) {
                return Err(self.err(SyntaxError::DuplicateAttribute(duplicate), start_line));
            }
        }
    }

    /// A tag or attribute name, ended by whitespace, `>`, `/` or `=`.
    /// Leading whitespace is skipped first, so `< tag>` and `</ tag>` parse
    /// like their tight forms. May be empty; the caller decides what that
    /// means.
    fn extract_name(
        &mut self,
        what: &'static str,
        start_line: usize,
    ) -> Result<String, ParseError> {
        self.base.skip_any_space();
        let mut name = String::new();
        while self.base.has_data()
            && !self.base.is_space()
            && !is_name_terminator(self.base.curr())
        {
            let ch = self.base.curr();
            if is_invalid_name_char(ch) {
                return Err(self.err(SyntaxError::InvalidNameChar { ch, what }, start_line));
            }
            name.push(ch);
            self.base.get_next();
        }
        Ok(name)
    }

    /// An attribute value after `=`: double-quoted (may span anything but a
    /// line break) or a bare token ended by whitespace, `>` or `/`.
    fn attr_value(&mut self, start_line: usize) -> Result<String, ParseError> {
        if self.base.eat('"') {
            return self
                .base
                .collect_until(|c| c == '"', |c| c == '\n')
                .map_err(|_| self.err(SyntaxError::TruncatedAttributeValue, start_line));
        }
        let mut value = String::new();
        while self.base.has_data()
            && !self.base.is_space()
            && self.base.curr() != '>'
            && self.base.curr() != '/'
        {
            let ch = self.base.curr();
            if matches!(ch, '<' | '=' | '"') {
                return Err(self.err(SyntaxError::UnexpectedContent(ch), start_line));
            }
            value.push(ch);
            self.base.get_next();
        }
        if value.is_empty() {
            return Err(self.err(SyntaxError::TruncatedAttributeValue, start_line));
        }
        Ok(value)
    }

    fn err(&self, source: SyntaxError, line: usize) -> ParseError {
        ParseError { source, line }
    }
}

impl<E: Codec> Iterator for Tokenizer<'_, E> {
    type Item = Result<MarkupEvent, ParseError>;

    /// Yields events until [`MarkupEvent::None`] (which is not yielded) or
    /// the first error (which is yielded once).
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_event() {
            Ok(MarkupEvent::None) => {
                self.done = true;
                None
            }
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
