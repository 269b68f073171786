//! Shared utilities for markwell.

use std::borrow::Cow;

use memchr::memmem;

/// Decode bytes to a string with encoding detection.
///
/// Tries UTF-8 first, then the hinted encoding, then Windows-1252 (the
/// usual encoding of legacy clipboard HTML, a superset of ISO-8859-1).
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    // Try UTF-8 first (handles BOM automatically)
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    // If UTF-8 failed, try the hint encoding
    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find a declared charset in the first kilobyte of an HTML fragment.
///
/// Recognizes `<meta charset="...">`, the `charset=` parameter of an
/// http-equiv content type, and the XML declaration's `encoding="..."`.
pub fn extract_charset(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(1024);
    let prefix = &bytes[..check_len];

    for needle in [&b"charset="[..], &b"encoding="[..]] {
        let lowered = prefix.to_ascii_lowercase();
        let Some(pos) = memmem::find(&lowered, needle) else {
            continue;
        };
        let after = &prefix[pos + needle.len()..];
        if let Some(value) = read_attr_value(after) {
            return Some(value);
        }
    }
    None
}

/// Read a quoted or bare attribute value at the start of `bytes`.
fn read_attr_value(bytes: &[u8]) -> Option<&str> {
    let first = *bytes.first()?;
    let value = if first == b'"' || first == b'\'' {
        let end = memchr::memchr(first, &bytes[1..])? + 1;
        &bytes[1..end]
    } else {
        let end = bytes
            .iter()
            .position(|&b| b == b'"' || b == b'\'' || b == b';' || b == b'>' || b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        &bytes[..end]
    };
    if value.is_empty() {
        return None;
    }
    std::str::from_utf8(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("héllo".as_bytes(), None), "héllo");
    }

    #[test]
    fn test_decode_falls_back_to_cp1252() {
        assert_eq!(decode_text(b"caf\xe9", None), "café");
        assert_eq!(decode_text(b"\x93quoted\x94", Some("nonsense")), "\u{201c}quoted\u{201d}");
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(extract_charset(b"<meta charset=\"utf-8\">"), Some("utf-8"));
        assert_eq!(extract_charset(b"<META CHARSET=latin1>"), Some("latin1"));
        assert_eq!(
            extract_charset(b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\">"),
            Some("windows-1252")
        );
        assert_eq!(
            extract_charset(b"<?xml version=\"1.0\" encoding='ISO-8859-1'?>"),
            Some("ISO-8859-1")
        );
        assert_eq!(extract_charset(b"<p>no declaration</p>"), None);
    }
}
