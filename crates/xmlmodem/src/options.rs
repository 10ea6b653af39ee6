/// Configuration options for the markup tokenizer.
///
/// These options control which event payloads are materialized. Constructs
/// are always scanned over correctly either way; the toggles only decide
/// whether the payload string is built and the event emitted, which matters
/// for throughput when the consumer only cares about tag structure.
///
/// # Default
///
/// Comments are skipped, text sections are collected.
#[derive(Debug, Clone, Copy)]
pub struct TokenizerOptions {
    /// Whether to materialize comment bodies and emit
    /// [`MarkupEvent::Comment`](crate::MarkupEvent::Comment) events.
    ///
    /// When `false`, comments are skipped without building their payload.
    ///
    /// # Default
    ///
    /// `false`
    pub comment_events: bool,

    /// Whether to materialize text sections (including CDATA) and emit
    /// [`MarkupEvent::Text`](crate::MarkupEvent::Text) events.
    ///
    /// When `false`, text is skipped without building its payload.
    ///
    /// # Default
    ///
    /// `true`
    pub text_events: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            comment_events: false,
            text_events: true,
        }
    }
}
