//! Semantic events yielded by the tokenizer.

use alloc::string::String;

use crate::attrmap::AttrMap;

/// One semantic unit of markup.
///
/// Each call to [`crate::Tokenizer::next_event`] produces a fresh event;
/// payloads are owned, normalized text (decoding may cross encodings, so
/// borrowed slices of the raw buffer are not representable in general).
///
/// `None` marks the end of the stream and is yielded idempotently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MarkupEvent {
    /// No more data.
    #[default]
    None,
    /// `<!-- ... -->`
    Comment(String),
    /// Character data between tags, or a `<![CDATA[ ... ]]>` section.
    Text(String),
    /// `<tag attr1 attr2="val">`
    OpenTag { name: String, attributes: AttrMap },
    /// `</tag>`, or the synthesized close of a self-closing `<tag/>`.
    CloseTag(String),
    /// `<? ... ?>`
    ProcInstr(String),
    /// `<!DOCTYPE ...>` and similar, not structurally parsed.
    SpecialBlock(String),
}

impl MarkupEvent {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, MarkupEvent::None)
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self, MarkupEvent::Comment(_))
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, MarkupEvent::Text(_))
    }

    #[must_use]
    pub fn is_proc_instr(&self) -> bool {
        matches!(self, MarkupEvent::ProcInstr(_))
    }

    #[must_use]
    pub fn is_special_block(&self) -> bool {
        matches!(self, MarkupEvent::SpecialBlock(_))
    }

    #[must_use]
    pub fn is_open_tag(&self, name: &str) -> bool {
        matches!(self, MarkupEvent::OpenTag { name: n, .. } if n == name)
    }

    #[must_use]
    pub fn is_close_tag(&self, name: &str) -> bool {
        matches!(self, MarkupEvent::CloseTag(n) if n == name)
    }

    /// The payload text: tag name, comment body, text content.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            MarkupEvent::None => None,
            MarkupEvent::Comment(s)
            | MarkupEvent::Text(s)
            | MarkupEvent::CloseTag(s)
            | MarkupEvent::ProcInstr(s)
            | MarkupEvent::SpecialBlock(s) => Some(s),
            MarkupEvent::OpenTag { name, .. } => Some(name),
        }
    }

    /// Attributes of an open tag.
    #[must_use]
    pub fn attributes(&self) -> Option<&AttrMap> {
        match self {
            MarkupEvent::OpenTag { attributes, .. } => Some(attributes),
            _ => None,
        }
    }
}

impl core::fmt::Display for MarkupEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MarkupEvent::None => f.write_str("(none)"),
            MarkupEvent::Comment(s) => write!(f, "<!-- {s} -->"),
            MarkupEvent::Text(s) => f.write_str(s),
            MarkupEvent::OpenTag { name, .. } => write!(f, "<{name}>"),
            MarkupEvent::CloseTag(s) => write!(f, "</{s}>"),
            MarkupEvent::ProcInstr(s) => write!(f, "<?{s}?>"),
            MarkupEvent::SpecialBlock(s) => write!(f, "<!{s}>"),
        }
    }
}
