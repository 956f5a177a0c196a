//! Byte-level decoding of XML input ahead of parsing.
//!
//! The encoding is taken from, in order:
//! - a byte order mark
//! - a UTF-16 `<?` signature without BOM
//! - the `encoding` pseudo-attribute of the XML declaration
//!
//! Anything else is read as UTF-8.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Decode `bytes` as an XML document would be decoded by a conforming parser.
///
/// Returns `None` when the bytes are not valid in the detected encoding.
pub fn decode_xml(bytes: &[u8]) -> Option<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => {
            let encoding = utf16_signature(bytes)
                .or_else(|| declared_encoding(bytes))
                .unwrap_or(UTF_8);
            (encoding, bytes)
        }
    };
    encoding.decode_without_bom_handling_and_without_replacement(body)
}

/// UTF-16 detected from `<?` encoded without a BOM
fn utf16_signature(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.starts_with(&[b'<', 0, b'?', 0]) {
        Some(UTF_16LE)
    } else if bytes.starts_with(&[0, b'<', 0, b'?']) {
        Some(UTF_16BE)
    } else {
        None
    }
}

/// Encoding named in the XML declaration. Labels that cannot describe an ASCII-compatible byte
/// stream (e.g. "UTF-16" in a file that has neither BOM nor UTF-16 signature) are ignored.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = bytes.strip_prefix(b"<?xml")?;
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = &head[..end];

    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let rest = skip_whitespace(&decl[at + b"encoding".len()..]).strip_prefix(b"=")?;
    let (&quote, rest) = skip_whitespace(rest).split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = rest.iter().position(|&b| b == quote)?;

    Encoding::for_label(&rest[..len]).filter(|encoding| encoding.is_ascii_compatible())
}

fn skip_whitespace(bytes: &[u8]) -> &[u8] {
    let n = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bytes[n..]
}
