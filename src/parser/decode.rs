//! Content-Transfer-Encoding reversal and charset normalization.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::warn;

use crate::error::Result;
use crate::parser::mime::TransferEncoding;

/// Decode base64 text, tolerating line wraps and stray whitespace.
///
/// # Errors
///
/// Returns an error if the remaining characters are not valid base64.
/// Callers in the part pipeline treat this as recoverable and drop the
/// offending part.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

/// Decode quoted-printable text (RFC 2045) to bytes.
///
/// Soft line breaks (`=` before a line terminator) are removed and
/// `=XX` escapes become bytes. Malformed escapes pass through
/// literally; this decoder never fails.
pub fn decode_quoted_printable(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        // Soft line break: "=\n" or "=\r\n"
        if bytes.get(i + 1) == Some(&b'\n') {
            i += 2;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'\r') && bytes.get(i + 2) == Some(&b'\n') {
            i += 3;
            continue;
        }

        // Hex escape "=XX"
        if let (Some(&hi), Some(&lo)) = (bytes.get(i + 1), bytes.get(i + 2)) {
            if let (Some(hi), Some(lo)) = (hex_val(hi), hex_val(lo)) {
                result.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }

        // Malformed escape: keep the '=' as-is
        result.push(b'=');
        i += 1;
    }

    result
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Reverse a transfer encoding, yielding the payload bytes.
///
/// # Errors
///
/// Only the base64 branch can fail; identity and quoted-printable are
/// total.
pub fn decode_transfer(raw: &str, encoding: TransferEncoding) -> Result<Vec<u8>> {
    match encoding {
        TransferEncoding::Base64 => decode_base64(raw),
        TransferEncoding::QuotedPrintable => Ok(decode_quoted_printable(raw)),
        _ => Ok(raw.as_bytes().to_vec()),
    }
}

/// Decode a text part: transfer encoding first, then charset.
///
/// Undecodable base64 in a *text* part falls back to the raw text
/// rather than dropping the body (best effort, never fatal).
pub fn decode_text(raw: &str, encoding: TransferEncoding, charset: &str) -> String {
    match decode_transfer(raw, encoding) {
        Ok(bytes) => decode_charset(charset, &bytes),
        Err(e) => {
            warn!(error = %e, "undecodable text part, keeping raw content");
            raw.to_string()
        }
    }
}

/// Decode bytes using a named charset.
///
/// Unknown charset labels fall back to lossy UTF-8.
pub fn decode_charset(charset: &str, bytes: &[u8]) -> String {
    let label = charset.trim().to_lowercase();
    match label.as_str() {
        "" | "utf-8" | "utf8" | "us-ascii" | "ascii" => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        _ => {
            if let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) {
                let (decoded, _, _) = encoding.decode(bytes);
                decoded.into_owned()
            } else {
                warn!(
                    charset = charset,
                    "unknown charset, falling back to UTF-8 lossy"
                );
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
    }
}

/// Decoded byte length of a base64 string, without decoding it.
///
/// `floor(len * 3 / 4) - padding` over the whitespace-stripped input.
/// Matches the real decoded length for every valid base64 string.
pub fn decoded_len(base64_text: &str) -> u64 {
    let cleaned: String = base64_text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let padding = if cleaned.ends_with("==") {
        2
    } else if cleaned.ends_with('=') {
        1
    } else {
        0
    };
    (cleaned.len() as u64 * 3 / 4).saturating_sub(padding)
}
