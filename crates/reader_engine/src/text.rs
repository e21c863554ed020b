use std::borrow::Cow;
use std::ops::Range;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextDecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// How far into the document to look for an XML declaration.
const PROLOG_SCAN_BYTES: usize = 1024;

/// Decode a raw feed body into UTF-8 using:
/// BOM -> Content-Type charset -> XML declaration encoding -> chardetng fallback.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedText, TextDecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    if let Some(label) = xml_declared_encoding(bytes) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(['"', '\'']))
        })
        .next()
        .map(|s| s.to_string())
}

/// Reads `encoding="..."` from a leading `<?xml ... ?>` declaration.
fn xml_declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(PROLOG_SCAN_BYTES)];
    let head = String::from_utf8_lossy(head);
    let range = declared_encoding_range(&head)?;
    Some(head[range].to_string())
}

/// Rewrites the `encoding` pseudo-attribute of the XML declaration to UTF-8.
///
/// Decoded text is always UTF-8, so a declaration still naming the wire
/// charset would make an XML parser decode it a second time.
pub(crate) fn declare_utf8(text: &str) -> Cow<'_, str> {
    let Some(range) = declared_encoding_range(text) else {
        return Cow::Borrowed(text);
    };
    if text[range.clone()].eq_ignore_ascii_case("utf-8") {
        return Cow::Borrowed(text);
    }
    let mut rewritten = String::with_capacity(text.len());
    rewritten.push_str(&text[..range.start]);
    rewritten.push_str("UTF-8");
    rewritten.push_str(&text[range.end..]);
    Cow::Owned(rewritten)
}

/// Byte range of the quoted encoding value inside a leading XML declaration.
fn declared_encoding_range(text: &str) -> Option<Range<usize>> {
    let start = text.find("<?xml").filter(|start| *start < PROLOG_SCAN_BYTES)?;
    let end = start + text[start..].find("?>")?;
    let declaration = &text[start..end];
    let key_end = declaration.find("encoding")? + "encoding".len();
    let after_key = &declaration[key_end..];
    let after_eq = after_key.trim_start().strip_prefix('=')?.trim_start();
    let quote = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value_start = start + key_end + (after_key.len() - after_eq.len()) + 1;
    let value_len = text[value_start..end].find(quote)?;
    Some(value_start..value_start + value_len)
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedText, TextDecodeError> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(TextDecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "decoding error".into(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}
