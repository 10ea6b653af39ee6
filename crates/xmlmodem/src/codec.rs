//! Byte-level text codec: encoding detection and per-encoding decode/encode
//! of Unicode scalar values.
//!
//! Decoding never fails: a malformed sequence consumes a minimal number of
//! bytes and yields [`ERR_CODEPOINT`], so the layers above can keep scanning
//! structure even through damaged input. Structural policy (what to do when
//! the buffer ends mid-sequence) belongs to [`crate::ParserBase`], not here.

use alloc::vec::Vec;

/// Sentinel for "no current codepoint" (start of stream or depleted).
pub const NULL_CODEPOINT: char = '\0';

/// The replacement character, substituted for malformed or truncated
/// sequences.
pub const ERR_CODEPOINT: char = '\u{FFFD}';

/// The supported Unicode transformation formats.
///
/// Chosen once per input by [`Encoding::detect`] and never changed
/// mid-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Encoding {
    /// Detects the encoding from a byte-order mark, returning the encoding
    /// and the BOM length to skip.
    ///
    /// The UTF-16LE BOM (`FF FE`) is a prefix of the UTF-32LE one
    /// (`FF FE 00 00`), so the four-byte check must come first. Inputs
    /// shorter than three bytes, or without a recognized mark, default to
    /// UTF-8 with a zero-length BOM.
    #[must_use]
    pub fn detect(buf: &[u8]) -> (Encoding, usize) {
        if buf.len() > 2 {
            if buf[0] == 0xFF && buf[1] == 0xFE {
                if buf.len() >= 4 && buf[2] == 0x00 && buf[3] == 0x00 {
                    return (Encoding::Utf32Le, 4);
                }
                return (Encoding::Utf16Le, 2);
            } else if buf[0] == 0xFE && buf[1] == 0xFF {
                return (Encoding::Utf16Be, 2);
            } else if buf.len() >= 4
                && buf[0] == 0x00
                && buf[1] == 0x00
                && buf[2] == 0xFE
                && buf[3] == 0xFF
            {
                return (Encoding::Utf32Be, 4);
            } else if buf[0] == 0xEF && buf[1] == 0xBB && buf[2] == 0xBF {
                return (Encoding::Utf8, 3);
            }
        }
        (Encoding::Utf8, 0)
    }
}

impl core::fmt::Display for Encoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf32Le => "UTF-32LE",
            Encoding::Utf32Be => "UTF-32BE",
        })
    }
}

/// A transformation format as a compile-time capability.
///
/// Implemented by the five zero-sized markers ([`Utf8`], [`Utf16Le`],
/// [`Utf16Be`], [`Utf32Le`], [`Utf32Be`]) so that [`crate::Cursor`] and
/// everything above it monomorphize per encoding with no per-codepoint
/// branch on the format.
pub trait Codec {
    /// The runtime tag for this format.
    const ENCODING: Encoding;

    /// Minimum number of bytes needed to decode one complete codepoint.
    const MIN_BYTES: usize;

    /// Decodes the codepoint at `*pos`, advancing `*pos` by the bytes
    /// consumed.
    ///
    /// Precondition: at least [`Self::MIN_BYTES`] bytes remain at `*pos`.
    /// A malformed sequence yields [`ERR_CODEPOINT`].
    fn decode(buf: &[u8], pos: &mut usize) -> char;

    /// Appends the encoded form of `cp` to `out`. Inverse of
    /// [`Self::decode`] for every scalar value.
    fn encode(cp: char, out: &mut Vec<u8>);
}

#[inline]
fn scalar_or_err(v: u32) -> char {
    char::from_u32(v).unwrap_or(ERR_CODEPOINT)
}

/// UTF-8: one to four bytes per codepoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8;

impl Codec for Utf8 {
    const ENCODING: Encoding = Encoding::Utf8;
    const MIN_BYTES: usize = 1;

    fn decode(buf: &[u8], pos: &mut usize) -> char {
        debug_assert!(*pos < buf.len());
        let b0 = buf[*pos];
        if b0 & 0x80 == 0 {
            *pos += 1;
            return char::from(b0);
        }
        if b0 & 0xE0 == 0xC0 && *pos + 1 < buf.len() && buf[*pos + 1] & 0xC0 == 0x80 {
            let v = (u32::from(b0 & 0x1F) << 6) | u32::from(buf[*pos + 1] & 0x3F);
            *pos += 2;
            return scalar_or_err(v);
        }
        if b0 & 0xF0 == 0xE0
            && *pos + 2 < buf.len()
            && buf[*pos + 1] & 0xC0 == 0x80
            && buf[*pos + 2] & 0xC0 == 0x80
        {
            let v = (u32::from(b0 & 0x0F) << 12)
                | (u32::from(buf[*pos + 1] & 0x3F) << 6)
                | u32::from(buf[*pos + 2] & 0x3F);
            *pos += 3;
            return scalar_or_err(v);
        }
        if b0 & 0xF8 == 0xF0
            && *pos + 3 < buf.len()
            && buf[*pos + 1] & 0xC0 == 0x80
            && buf[*pos + 2] & 0xC0 == 0x80
            && buf[*pos + 3] & 0xC0 == 0x80
        {
            let v = (u32::from(b0 & 0x07) << 18)
                | (u32::from(buf[*pos + 1] & 0x3F) << 12)
                | (u32::from(buf[*pos + 2] & 0x3F) << 6)
                | u32::from(buf[*pos + 3] & 0x3F);
            *pos += 4;
            return scalar_or_err(v);
        }
        // Malformed lead or continuation byte: consume exactly one byte so
        // the scan can resynchronize on the next one.
        *pos += 1;
        ERR_CODEPOINT
    }

    fn encode(cp: char, out: &mut Vec<u8>) {
        let mut tmp = [0u8; 4];
        out.extend_from_slice(cp.encode_utf8(&mut tmp).as_bytes());
    }
}

#[inline]
fn utf16_unit(buf: &[u8], pos: usize, big_endian: bool) -> u16 {
    let pair = [buf[pos], buf[pos + 1]];
    if big_endian {
        u16::from_be_bytes(pair)
    } else {
        u16::from_le_bytes(pair)
    }
}

/// Shared UTF-16 decode. A code unit outside the surrogate range is the
/// codepoint itself (Basic Multilingual Plane); a high surrogate
/// (`D800..DC00`) must be followed by a low one (`DC00..E000`), combined as
/// `0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)`. An unpaired or
/// reversed surrogate yields the replacement character with only the first
/// unit consumed.
fn decode_utf16(buf: &[u8], pos: &mut usize, big_endian: bool) -> char {
    debug_assert!(*pos + 1 < buf.len());
    let unit1 = utf16_unit(buf, *pos, big_endian);
    *pos += 2;
    if !(0xD800..0xE000).contains(&unit1) {
        return scalar_or_err(u32::from(unit1));
    }
    if unit1 >= 0xDC00 || *pos + 1 >= buf.len() {
        // Low surrogate first, or high surrogate truncated at buffer end.
        return ERR_CODEPOINT;
    }
    let unit2 = utf16_unit(buf, *pos, big_endian);
    if !(0xDC00..0xE000).contains(&unit2) {
        return ERR_CODEPOINT;
    }
    *pos += 2;
    scalar_or_err(0x10000 + ((u32::from(unit1) - 0xD800) << 10) + (u32::from(unit2) - 0xDC00))
}

fn encode_utf16(cp: char, out: &mut Vec<u8>, big_endian: bool) {
    let mut push_unit = |unit: u16| {
        let bytes = if big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        };
        out.extend_from_slice(&bytes);
    };
    let v = u32::from(cp);
    if v < 0x10000 {
        #[allow(clippy::cast_possible_truncation)]
        push_unit(v as u16);
    } else {
        let v = v - 0x10000;
        #[allow(clippy::cast_possible_truncation)]
        push_unit((0xD800 + (v >> 10)) as u16);
        #[allow(clippy::cast_possible_truncation)]
        push_unit((0xDC00 + (v & 0x3FF)) as u16);
    }
}

/// UTF-16, little endian code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf16Le;

impl Codec for Utf16Le {
    const ENCODING: Encoding = Encoding::Utf16Le;
    const MIN_BYTES: usize = 2;

    fn decode(buf: &[u8], pos: &mut usize) -> char {
        decode_utf16(buf, pos, false)
    }

    fn encode(cp: char, out: &mut Vec<u8>) {
        encode_utf16(cp, out, false);
    }
}

/// UTF-16, big endian code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf16Be;

impl Codec for Utf16Be {
    const ENCODING: Encoding = Encoding::Utf16Be;
    const MIN_BYTES: usize = 2;

    fn decode(buf: &[u8], pos: &mut usize) -> char {
        decode_utf16(buf, pos, true)
    }

    fn encode(cp: char, out: &mut Vec<u8>) {
        encode_utf16(cp, out, true);
    }
}

/// UTF-32, little endian: always four bytes per codepoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf32Le;

impl Codec for Utf32Le {
    const ENCODING: Encoding = Encoding::Utf32Le;
    const MIN_BYTES: usize = 4;

    fn decode(buf: &[u8], pos: &mut usize) -> char {
        debug_assert!(*pos + 3 < buf.len());
        let v = u32::from_le_bytes([buf[*pos], buf[*pos + 1], buf[*pos + 2], buf[*pos + 3]]);
        *pos += 4;
        scalar_or_err(v)
    }

    fn encode(cp: char, out: &mut Vec<u8>) {
        out.extend_from_slice(&u32::from(cp).to_le_bytes());
    }
}

/// UTF-32, big endian: always four bytes per codepoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf32Be;

impl Codec for Utf32Be {
    const ENCODING: Encoding = Encoding::Utf32Be;
    const MIN_BYTES: usize = 4;

    fn decode(buf: &[u8], pos: &mut usize) -> char {
        debug_assert!(*pos + 3 < buf.len());
        let v = u32::from_be_bytes([buf[*pos], buf[*pos + 1], buf[*pos + 2], buf[*pos + 3]]);
        *pos += 4;
        scalar_or_err(v)
    }

    fn encode(cp: char, out: &mut Vec<u8>) {
        out.extend_from_slice(&u32::from(cp).to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(&[0xEF, 0xBB, 0xBF, b'<'], Encoding::Utf8, 3)]
    #[case(&[0xFF, 0xFE, 0x00, 0x00], Encoding::Utf32Le, 4)]
    #[case(&[0xFF, 0xFE, b'<', 0x00], Encoding::Utf16Le, 2)]
    #[case(&[0xFE, 0xFF, 0x00, b'<'], Encoding::Utf16Be, 2)]
    #[case(&[0x00, 0x00, 0xFE, 0xFF], Encoding::Utf32Be, 4)]
    #[case(b"<root/>", Encoding::Utf8, 0)]
    #[case(b"", Encoding::Utf8, 0)]
    #[case(&[0xFF, 0xFE], Encoding::Utf8, 0)] // too short to sniff
    fn bom_detection(#[case] buf: &[u8], #[case] enc: Encoding, #[case] bom_len: usize) {
        assert_eq!(Encoding::detect(buf), (enc, bom_len));
    }

    #[test]
    fn utf8_decode_widths() {
        let buf = "a\u{00E9}\u{20AC}\u{1F600}".as_bytes();
        let mut pos = 0;
        assert_eq!(Utf8::decode(buf, &mut pos), 'a');
        assert_eq!(pos, 1);
        assert_eq!(Utf8::decode(buf, &mut pos), '\u{00E9}');
        assert_eq!(pos, 3);
        assert_eq!(Utf8::decode(buf, &mut pos), '\u{20AC}');
        assert_eq!(pos, 6);
        assert_eq!(Utf8::decode(buf, &mut pos), '\u{1F600}');
        assert_eq!(pos, 10);
    }

    #[test]
    fn utf8_malformed_consumes_one_byte() {
        // 0xC3 lead byte followed by a non-continuation byte.
        let buf = [0xC3, b'a'];
        let mut pos = 0;
        assert_eq!(Utf8::decode(&buf, &mut pos), ERR_CODEPOINT);
        assert_eq!(pos, 1);
        assert_eq!(Utf8::decode(&buf, &mut pos), 'a');

        // Bare continuation byte.
        let buf = [0x80, b'b'];
        let mut pos = 0;
        assert_eq!(Utf8::decode(&buf, &mut pos), ERR_CODEPOINT);
        assert_eq!(pos, 1);
    }

    #[test]
    fn utf8_truncated_tail_consumes_one_byte() {
        // A 3-byte lead with only one byte left in the buffer.
        let buf = [0xE2];
        let mut pos = 0;
        assert_eq!(Utf8::decode(&buf, &mut pos), ERR_CODEPOINT);
        assert_eq!(pos, 1);
    }

    #[test]
    fn utf16_surrogate_pair() {
        // U+1F600 is D83D DE00.
        let buf = [0x3D, 0xD8, 0x00, 0xDE];
        let mut pos = 0;
        assert_eq!(Utf16Le::decode(&buf, &mut pos), '\u{1F600}');
        assert_eq!(pos, 4);

        let buf = [0xD8, 0x3D, 0xDE, 0x00];
        let mut pos = 0;
        assert_eq!(Utf16Be::decode(&buf, &mut pos), '\u{1F600}');
        assert_eq!(pos, 4);
    }

    #[test]
    fn utf16_unpaired_surrogate() {
        // High surrogate followed by a BMP unit: error, only the first unit
        // consumed so the following unit decodes normally.
        let buf = [0x3D, 0xD8, b'a', 0x00];
        let mut pos = 0;
        assert_eq!(Utf16Le::decode(&buf, &mut pos), ERR_CODEPOINT);
        assert_eq!(pos, 2);
        assert_eq!(Utf16Le::decode(&buf, &mut pos), 'a');

        // Low surrogate first.
        let buf = [0x00, 0xDE, b'a', 0x00];
        let mut pos = 0;
        assert_eq!(Utf16Le::decode(&buf, &mut pos), ERR_CODEPOINT);
        assert_eq!(pos, 2);
    }

    #[test]
    fn utf32_endianness() {
        let buf = 0x20AC_u32.to_le_bytes();
        let mut pos = 0;
        assert_eq!(Utf32Le::decode(&buf, &mut pos), '\u{20AC}');

        let buf = 0x20AC_u32.to_be_bytes();
        let mut pos = 0;
        assert_eq!(Utf32Be::decode(&buf, &mut pos), '\u{20AC}');
    }

    #[test]
    fn utf32_out_of_range_is_error() {
        let buf = 0x0011_0000_u32.to_le_bytes();
        let mut pos = 0;
        assert_eq!(Utf32Le::decode(&buf, &mut pos), ERR_CODEPOINT);
        assert_eq!(pos, 4);
    }

    fn roundtrip<E: Codec>(cp: char) -> bool {
        let mut bytes = Vec::new();
        E::encode(cp, &mut bytes);
        let mut pos = 0;
        E::decode(&bytes, &mut pos) == cp && pos == bytes.len()
    }

    #[quickcheck]
    fn roundtrip_all_encodings(cp: char) -> bool {
        roundtrip::<Utf8>(cp)
            && roundtrip::<Utf16Le>(cp)
            && roundtrip::<Utf16Be>(cp)
            && roundtrip::<Utf32Le>(cp)
            && roundtrip::<Utf32Be>(cp)
    }

    #[rstest]
    #[case('a')] // ASCII
    #[case('\u{00E9}')] // 2-byte UTF-8
    #[case('\u{20AC}')] // 3-byte UTF-8
    #[case('\u{1F600}')] // 4-byte UTF-8, surrogate pair in UTF-16
    fn roundtrip_representative(#[case] cp: char) {
        assert!(roundtrip::<Utf8>(cp));
        assert!(roundtrip::<Utf16Le>(cp));
        assert!(roundtrip::<Utf16Be>(cp));
        assert!(roundtrip::<Utf32Le>(cp));
        assert!(roundtrip::<Utf32Be>(cp));
    }
}
