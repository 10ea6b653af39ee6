//! Encoding-agnostic parsing primitives: a codepoint-level cursor with line
//! tracking, class predicates, transactional matching and bounded
//! collection, all with exact backtracking.
//!
//! Backtracking is a plain in-memory rewind: [`ParserBase::save`] returns a
//! [`Context`] value and [`ParserBase::restore`] brings the parser back to a
//! state observationally identical to the moment of saving. Every failing
//! speculative operation restores the pre-attempt context before reporting,
//! so callers never observe a partially consumed literal (strong exception
//! guarantee).

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::codec::{Codec, ERR_CODEPOINT, NULL_CODEPOINT};
use crate::cursor::Cursor;
use crate::error::{Issue, ParseError, SyntaxError};

/// An opaque, copyable snapshot of the parser position.
///
/// `restore(save())` is a no-op: restoring yields identical subsequent
/// decode results as if nothing had been attempted in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    byte_pos: usize,
    curr_byte_start: usize,
    curr: char,
    depleted: bool,
    line: usize,
    offset: usize,
}

/// Codepoint-level cursor over a byte buffer in the fixed encoding `E`.
///
/// Holds the current codepoint, the 1-based line number and a monotonically
/// increasing logical (codepoint) offset, plus a list of non-fatal
/// [`Issue`]s observed along the way.
///
/// Truncation policy: when bytes remain but no complete codepoint can be
/// decoded, the current codepoint becomes the replacement character, the
/// stream is marked depleted and an issue is recorded. This matches the
/// codec's local substitution convention and is applied uniformly.
#[derive(Debug)]
pub struct ParserBase<'b, E: Codec> {
    cursor: Cursor<'b, E>,
    curr: char,
    depleted: bool,
    curr_byte_start: usize,
    line: usize,
    offset: usize,
    issues: Vec<Issue>,
}

impl<'b, E: Codec> ParserBase<'b, E> {
    /// Creates a parser over `buf`, positioned on the first codepoint.
    ///
    /// `buf` must not include a byte-order mark; detection and stripping
    /// happen before the encoding is chosen (see [`crate::AnyTokenizer`]).
    #[must_use]
    pub fn new(buf: &'b [u8]) -> Self {
        let mut parser = Self {
            cursor: Cursor::new(buf),
            curr: NULL_CODEPOINT,
            depleted: false,
            curr_byte_start: 0,
            line: 1,
            offset: 0,
            issues: Vec::new(),
        };
        let _ = parser.get_next();
        parser
    }

    /// Whether a current codepoint exists.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.depleted
    }

    /// The current codepoint, or [`NULL_CODEPOINT`] when depleted.
    #[must_use]
    pub fn curr(&self) -> char {
        self.curr
    }

    /// Current line, 1-based. Incremented exactly once per consumed `\n`.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Count of codepoints consumed so far; the logical position of the
    /// current codepoint.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Advances to the next codepoint; returns `false` exactly when the
    /// stream is exhausted.
    pub fn get_next(&mut self) -> bool {
        if self.depleted {
            return false;
        }
        if self.curr == '\n' {
            self.line += 1;
        }
        self.curr_byte_start = self.cursor.byte_pos();
        if self.cursor.has_codepoint() {
            self.curr = self.cursor.next_codepoint();
            self.offset += 1;
            true
        } else if self.cursor.has_bytes() {
            // The buffer ends mid-sequence. Substitute and deplete, but
            // keep this a non-fatal, reported condition.
            self.notify_issue("truncated codepoint at end of input");
            let end = self.cursor.bytes().len();
            self.cursor.set_byte_pos(end);
            self.curr = ERR_CODEPOINT;
            self.offset += 1;
            true
        } else {
            self.curr = NULL_CODEPOINT;
            self.depleted = true;
            false
        }
    }

    /// Snapshots the position for a later [`restore`](Self::restore).
    #[must_use]
    pub fn save(&self) -> Context {
        Context {
            byte_pos: self.cursor.byte_pos(),
            curr_byte_start: self.curr_byte_start,
            curr: self.curr,
            depleted: self.depleted,
            line: self.line,
            offset: self.offset,
        }
    }

    /// Rewinds to a previously saved [`Context`].
    pub fn restore(&mut self, ctx: Context) {
        self.cursor.set_byte_pos(ctx.byte_pos);
        self.curr_byte_start = ctx.curr_byte_start;
        self.curr = ctx.curr;
        self.depleted = ctx.depleted;
        self.line = ctx.line;
        self.offset = ctx.offset;
    }

    // ------------------------------------------------------------------
    // Class predicates on the current codepoint

    #[must_use]
    pub fn is_space(&self) -> bool {
        !self.depleted && self.curr.is_whitespace()
    }

    /// Space that is not a line terminator.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        !self.depleted && self.curr.is_whitespace() && self.curr != '\n'
    }

    #[must_use]
    pub fn is_endline(&self) -> bool {
        !self.depleted && self.curr == '\n'
    }

    #[must_use]
    pub fn is_digit(&self) -> bool {
        !self.depleted && self.curr.is_ascii_digit()
    }

    #[must_use]
    pub fn is_punct(&self) -> bool {
        !self.depleted && self.curr.is_ascii_punctuation()
    }

    // ------------------------------------------------------------------
    // Matching

    /// Consumes the current codepoint if and only if it equals `ch`.
    pub fn eat(&mut self, ch: char) -> bool {
        if !self.depleted && self.curr == ch {
            let _ = self.get_next();
            return true;
        }
        false
    }

    /// Consumes `seq` if and only if it matches in full.
    ///
    /// Transactional: on a partial mismatch the parser is rewound to the
    /// pre-attempt position.
    pub fn eat_seq(&mut self, seq: &str) -> bool {
        let ctx = self.save();
        for ch in seq.chars() {
            if self.depleted || self.curr != ch {
                self.restore(ctx);
                return false;
            }
            let _ = self.get_next();
        }
        true
    }

    // ------------------------------------------------------------------
    // Skipping

    /// Skips spaces except line terminators.
    pub fn skip_blanks(&mut self) {
        while self.is_blank() {
            let _ = self.get_next();
        }
    }

    /// Skips any space, line terminators included (line count updates).
    pub fn skip_any_space(&mut self) {
        while self.is_space() {
            let _ = self.get_next();
        }
    }

    /// Skips to just past the next line terminator, returning the skipped
    /// text (terminator excluded). At end of input, returns what remains.
    pub fn skip_line(&mut self) -> String {
        let mut skipped = String::new();
        while !self.depleted && self.curr != '\n' {
            skipped.push(self.curr);
            let _ = self.get_next();
        }
        let _ = self.eat('\n');
        skipped
    }

    /// Requires that only blanks remain before the next line terminator
    /// (or the end of input), and consumes through it.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::ExpectedEndOfLine`] when non-blank content is found
    /// on the line.
    pub fn skip_endline(&mut self) -> Result<(), ParseError> {
        self.skip_blanks();
        if self.depleted || self.eat('\n') {
            Ok(())
        } else {
            Err(self.parse_error(SyntaxError::ExpectedEndOfLine))
        }
    }

    // ------------------------------------------------------------------
    // Extraction

    /// Reads a maximal run of ASCII digits as a base-10 unsigned integer.
    /// A leading `+` is tolerated.
    ///
    /// # Errors
    ///
    /// A parse error when the current codepoint is not a digit, on a
    /// negative sign, or when the literal overflows `usize` (overflow is
    /// checked, never wrapping).
    pub fn extract_index(&mut self) -> Result<usize, ParseError> {
        if self.depleted {
            return Err(self.parse_error(SyntaxError::MissingIndex));
        }
        if self.curr == '+' {
            let _ = self.get_next();
            if self.depleted {
                return Err(self.parse_error(SyntaxError::MissingIndex));
            }
        } else if self.curr == '-' {
            return Err(self.parse_error(SyntaxError::NegativeIndex));
        }
        if !self.is_digit() {
            return Err(self.parse_error(SyntaxError::InvalidIndexChar(self.curr)));
        }
        let mut result = 0_usize;
        while self.is_digit() {
            let digit = (self.curr as usize) - ('0' as usize);
            result = result
                .checked_mul(10)
                .and_then(|r| r.checked_add(digit))
                .ok_or_else(|| self.parse_error(SyntaxError::IndexOverflow))?;
            let _ = self.get_next();
        }
        Ok(result)
    }

    /// Collects codepoints until one satisfying `is_end` is reached; the
    /// end codepoint is consumed but excluded from the payload.
    ///
    /// # Errors
    ///
    /// If a codepoint satisfying `is_unexpected` comes first, or the stream
    /// ends, the parser is rewound to the start of the scan and a parse
    /// error is raised there.
    pub fn collect_until(
        &mut self,
        mut is_end: impl FnMut(char) -> bool,
        mut is_unexpected: impl FnMut(char) -> bool,
    ) -> Result<String, ParseError> {
        let ctx = self.save();
        let mut out = String::new();
        while !self.depleted {
            let ch = self.curr;
            if is_end(ch) {
                let _ = self.get_next();
                return Ok(out);
            }
            if is_unexpected(ch) {
                self.restore(ctx);
                return Err(self.parse_error(SyntaxError::UnexpectedContent(ch)));
            }
            out.push(ch);
            let _ = self.get_next();
        }
        self.restore(ctx);
        Err(self.parse_error(SyntaxError::UnexpectedEndOfInput))
    }

    /// Collects codepoints until the fixed multi-codepoint terminator
    /// `end_block` (for example `-->` or `]]>`); the terminator is consumed
    /// but excluded from the payload.
    ///
    /// The scan is partial-match aware: when a prospective match breaks, a
    /// shorter suffix of the matched prefix may restart the terminator
    /// (failure-function style), so content like `***` before `*/` is kept
    /// in full.
    ///
    /// # Errors
    ///
    /// On exhaustion, rewinds to the start of the scan and reports the
    /// missing terminator at the line where the scan began.
    pub fn collect_until_seq(&mut self, end_block: &str) -> Result<String, ParseError> {
        self.scan_until_seq(end_block, true)
    }

    /// Like [`collect_until_seq`](Self::collect_until_seq), but discards the
    /// payload; for stepping over a construct whose content is not wanted.
    ///
    /// # Errors
    ///
    /// Same conditions as [`collect_until_seq`](Self::collect_until_seq).
    pub fn skip_until_seq(&mut self, end_block: &str) -> Result<(), ParseError> {
        self.scan_until_seq(end_block, false).map(|_| ())
    }

    fn scan_until_seq(&mut self, end_block: &str, keep: bool) -> Result<String, ParseError> {
        debug_assert!(!end_block.is_empty());
        let ctx = self.save();
        let end: Vec<char> = end_block.chars().collect();
        let fail = failure_table(&end);
        let mut out = String::new();
        let mut matched = 0_usize;
        while !self.depleted {
            let ch = self.curr;
            if keep {
                out.push(ch);
            }
            let _ = self.get_next();
            while matched > 0 && ch != end[matched] {
                matched = fail[matched - 1];
            }
            if ch == end[matched] {
                matched += 1;
                if matched == end.len() {
                    if keep {
                        // The payload tail is the terminator itself; drop it.
                        out.truncate(out.len() - end_block.len());
                    }
                    return Ok(out);
                }
            }
        }
        self.restore(ctx);
        Err(self.parse_error(SyntaxError::UnclosedContent {
            expected: String::from(end_block),
        }))
    }

    // ------------------------------------------------------------------
    // Diagnostics

    /// Records a non-fatal observation at the current position.
    pub fn notify_issue(&mut self, message: impl Into<String>) {
        self.issues.push(Issue {
            message: message.into(),
            line: self.line,
            offset: self.offset,
        });
    }

    /// Issues accumulated so far.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Drains the accumulated issues.
    pub fn take_issues(&mut self) -> Vec<Issue> {
        core::mem::take(&mut self.issues)
    }

    /// A parse error at the current line.
    #[must_use]
    pub fn parse_error(&self, source: SyntaxError) -> ParseError {
        ParseError {
            source,
            line: self.line,
        }
    }

    /// A parse error at the line where the offending construct began.
    #[must_use]
    pub fn parse_error_at(&self, source: SyntaxError, line: usize) -> ParseError {
        ParseError { source, line }
    }
}

/// Longest-proper-prefix-suffix table for the terminator, the standard
/// failure function of streaming string search.
fn failure_table(pattern: &[char]) -> Vec<usize> {
    let mut fail = vec![0_usize; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = fail[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        fail[i] = k;
    }
    fail
}
