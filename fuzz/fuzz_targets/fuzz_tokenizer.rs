#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xmlmodem::{AnyTokenizer, MarkupEvent, TokenizerOptions};

/// Raw bytes plus the option toggles, so the fuzzer exercises both the
/// collecting and the skipping scan paths over the same inputs.
#[derive(Debug, Arbitrary)]
struct Input<'a> {
    comment_events: bool,
    text_events: bool,
    data: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let options = TokenizerOptions {
        comment_events: input.comment_events,
        text_events: input.text_events,
    };
    let mut tokenizer = AnyTokenizer::with_options(input.data, options);
    let mut last_offset = tokenizer.offset();
    loop {
        match tokenizer.next_event() {
            Ok(MarkupEvent::None) | Err(_) => break,
            Ok(_) => {
                // A deferred close consumes nothing; everything else must
                // move the parser forward.
                let offset = tokenizer.offset();
                assert!(offset >= last_offset);
                last_offset = offset;
            }
        }
    }
    // Errors and issues are fine; panics and hangs are the bugs.
    let _ = tokenizer.take_issues();
});
