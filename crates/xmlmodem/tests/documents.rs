#![allow(missing_docs)]

use xmlmodem::{
    AnyTokenizer, Codec, Encoding, MarkupEvent, TokenizerOptions, Utf8, Utf16Be, Utf16Le, Utf32Be,
    Utf32Le,
};

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE catalog>
<!-- sample product feed -->
<catalog version="2" published>
    <product sku="A-100">
        <name>Widget</name>
        <price currency="EUR">9.99</price>
        <blurb><![CDATA[Use <b> & "quotes" freely]]></blurb>
        <discontinued/>
    </product>
</catalog>
"#;

fn render(event: &MarkupEvent) -> String {
    match event {
        MarkupEvent::None => "-".to_string(),
        MarkupEvent::Comment(s) => format!("comment({s})"),
        MarkupEvent::Text(s) => format!("text({s})"),
        MarkupEvent::OpenTag { name, attributes } => {
            let attrs: Vec<String> = attributes
                .iter()
                .map(|(k, v)| match v {
                    Some(v) => format!("{k}={v}"),
                    None => k.to_string(),
                })
                .collect();
            format!("open({name}|{})", attrs.join(","))
        }
        MarkupEvent::CloseTag(s) => format!("close({s})"),
        MarkupEvent::ProcInstr(s) => format!("pi({s})"),
        MarkupEvent::SpecialBlock(s) => format!("special({s})"),
    }
}

const EXPECTED: &[&str] = &[
    "pi(xml version=\"1.0\" encoding=\"utf-8\")",
    "special(DOCTYPE catalog)",
    "comment(sample product feed)",
    "open(catalog|version=2,published)",
    "open(product|sku=A-100)",
    "open(name|)",
    "text(Widget)",
    "close(name)",
    "open(price|currency=EUR)",
    "text(9.99)",
    "close(price)",
    "open(blurb|)",
    "text(Use <b> & \"quotes\" freely)",
    "close(blurb)",
    "open(discontinued|)",
    "close(discontinued)",
    "close(product)",
    "close(catalog)",
];

fn encode_with_bom<E: Codec>(bom: &[u8], doc: &str) -> Vec<u8> {
    let mut bytes = bom.to_vec();
    for ch in doc.chars() {
        E::encode(ch, &mut bytes);
    }
    bytes
}

fn transcript(bytes: &[u8], expected_encoding: Encoding) -> Vec<String> {
    let tokenizer = AnyTokenizer::with_options(
        bytes,
        TokenizerOptions {
            comment_events: true,
            text_events: true,
        },
    );
    assert_eq!(tokenizer.encoding(), expected_encoding);
    tokenizer
        .map(|ev| render(&ev.expect("document is well formed")))
        .collect()
}

#[test]
fn utf8_document() {
    assert_eq!(transcript(DOCUMENT.as_bytes(), Encoding::Utf8), EXPECTED);
}

#[test]
fn utf8_document_with_bom() {
    let bytes = encode_with_bom::<Utf8>(&[0xEF, 0xBB, 0xBF], DOCUMENT);
    assert_eq!(transcript(&bytes, Encoding::Utf8), EXPECTED);
}

#[test]
fn utf16_documents() {
    let bytes = encode_with_bom::<Utf16Le>(&[0xFF, 0xFE], DOCUMENT);
    assert_eq!(transcript(&bytes, Encoding::Utf16Le), EXPECTED);

    let bytes = encode_with_bom::<Utf16Be>(&[0xFE, 0xFF], DOCUMENT);
    assert_eq!(transcript(&bytes, Encoding::Utf16Be), EXPECTED);
}

#[test]
fn utf32_documents() {
    let bytes = encode_with_bom::<Utf32Le>(&[0xFF, 0xFE, 0x00, 0x00], DOCUMENT);
    assert_eq!(transcript(&bytes, Encoding::Utf32Le), EXPECTED);

    let bytes = encode_with_bom::<Utf32Be>(&[0x00, 0x00, 0xFE, 0xFF], DOCUMENT);
    assert_eq!(transcript(&bytes, Encoding::Utf32Be), EXPECTED);
}

#[test]
fn default_options_drop_comments() {
    let events: Result<Vec<_>, _> = AnyTokenizer::from_bytes(DOCUMENT.as_bytes()).collect();
    let events = events.unwrap();
    assert!(events.iter().all(|ev| !ev.is_comment()));
    assert_eq!(events.len(), EXPECTED.len() - 1);
}

#[test]
fn structure_only_scan() {
    let tokenizer = AnyTokenizer::with_options(
        DOCUMENT.as_bytes(),
        TokenizerOptions {
            comment_events: false,
            text_events: false,
        },
    );
    let tags: Vec<String> = tokenizer
        .map(|ev| render(&ev.unwrap()))
        .filter(|r| r.starts_with("open("))
        .collect();
    assert_eq!(
        tags,
        [
            "open(catalog|version=2,published)",
            "open(product|sku=A-100)",
            "open(name|)",
            "open(price|currency=EUR)",
            "open(blurb|)",
            "open(discontinued|)",
        ]
    );
}
