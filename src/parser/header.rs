//! RFC 5322 header parsing: an explicit line-scanning state machine
//! for folded headers, plus RFC 2047 encoded-word decoding.

use crate::model::headers::HeaderMap;
use crate::parser::decode::{decode_base64, decode_charset, decode_quoted_printable};

/// Scanner state while walking header lines.
enum Scan {
    /// No header is being accumulated.
    AwaitingName,
    /// A `name: value` line was seen; continuation lines append here.
    Accumulating { name: String, value: String },
}

impl Scan {
    fn flush(&mut self, headers: &mut HeaderMap) {
        if let Scan::Accumulating { name, value } = std::mem::replace(self, Scan::AwaitingName) {
            headers.insert(name, decode_encoded_words(value.trim()));
        }
    }
}

/// Parse a header block into a [`HeaderMap`].
///
/// Input must already have normalized (`\n`) line endings. Folded
/// continuation lines are joined with a single space; encoded-words
/// are decoded as values are stored. Malformed lines (no colon, no
/// leading whitespace) end the current header and are dropped; this
/// function never fails.
pub fn parse_headers(text: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut state = Scan::AwaitingName;

    for line in text.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            // Continuation of the current header, if any
            if let Scan::Accumulating { value, .. } = &mut state {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        state.flush(&mut headers);

        match line.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                state = Scan::Accumulating {
                    name: name.trim().to_string(),
                    value: value.trim().to_string(),
                };
            }
            // No colon (or empty name): malformed, dropped
            _ => {}
        }
    }

    state.flush(&mut headers);
    headers
}

/// Decode RFC 2047 encoded-words in a header value.
///
/// Example: `"=?UTF-8?B?SG9sYQ==?= =?UTF-8?B?IG11bmRv?="` → `"Hola mundo"`.
///
/// Tokens that fail to decode are preserved verbatim. Whitespace
/// between two adjacent encoded words is elided (RFC 2047 §6.2).
pub fn decode_encoded_words(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut remaining = input;
    let mut last_was_encoded = false;

    while let Some(start) = remaining.find("=?") {
        let before = &remaining[..start];
        let after_start = &remaining[start + 2..];

        match try_decode_one_word(after_start) {
            Some(decoded) => {
                // Whitespace between two decodable words is elided;
                // anything else separating them is kept
                if !last_was_encoded || !before.trim().is_empty() {
                    result.push_str(before);
                }
                result.push_str(&decoded.text);
                remaining = &remaining[start + 2 + decoded.consumed..];
                last_was_encoded = true;
            }
            None => {
                result.push_str(before);
                result.push_str("=?");
                remaining = after_start;
                last_was_encoded = false;
            }
        }
    }

    result.push_str(remaining);
    result
}

struct DecodedWord {
    text: String,
    consumed: usize, // bytes consumed after the initial "=?"
}

fn try_decode_one_word(s: &str) -> Option<DecodedWord> {
    // Format: charset?encoding?encoded_text?=
    let first_q = s.find('?')?;
    let charset = &s[..first_q];

    let rest = &s[first_q + 1..];
    let second_q = rest.find('?')?;
    let encoding = &rest[..second_q];

    let rest2 = &rest[second_q + 1..];
    let end = rest2.find("?=")?;
    let encoded_text = &rest2[..end];

    let total_consumed = first_q + 1 + second_q + 1 + end + 2;

    let bytes = match encoding {
        "B" | "b" => decode_base64(encoded_text).ok()?,
        // Q encoding: underscores are spaces, then =XX escapes
        "Q" | "q" => decode_quoted_printable(&encoded_text.replace('_', " ")),
        _ => return None,
    };

    Some(DecodedWord {
        text: decode_charset(charset, &bytes),
        consumed: total_consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_headers() {
        let h = parse_headers("From: a@x.com\nTo: b@x.com\nSubject: hi\n");
        assert_eq!(h.get("from"), Some("a@x.com"));
        assert_eq!(h.get("to"), Some("b@x.com"));
        assert_eq!(h.get("subject"), Some("hi"));
    }

    #[test]
    fn test_folded_continuation_joined() {
        let h = parse_headers("Subject: This is a long\n\tsubject line\nFrom: u@example.com\n");
        assert_eq!(h.get("subject"), Some("This is a long subject line"));
        assert_eq!(h.get("from"), Some("u@example.com"));
    }

    #[test]
    fn test_malformed_line_dropped_not_fatal() {
        let h = parse_headers("From: a@x.com\nthis line has no colon\nTo: b@x.com\n");
        assert_eq!(h.get("from"), Some("a@x.com"));
        assert_eq!(h.get("to"), Some("b@x.com"));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_malformed_line_ends_accumulation() {
        // The junk line must not be appended to the previous header
        let h = parse_headers("Subject: start\njunk without colon\n continuation-like\n");
        assert_eq!(h.get("subject"), Some("start"));
    }

    #[test]
    fn test_continuation_without_header_ignored() {
        let h = parse_headers(" stray continuation\nFrom: a@x.com\n");
        assert_eq!(h.len(), 1);
        assert_eq!(h.get("from"), Some("a@x.com"));
    }

    #[test]
    fn test_decode_base64_encoded_word() {
        assert_eq!(
            decode_encoded_words("=?UTF-8?B?SG9sYSBtdW5kbw==?="),
            "Hola mundo"
        );
    }

    #[test]
    fn test_decode_q_encoded_word() {
        assert_eq!(decode_encoded_words("=?ISO-8859-1?Q?caf=E9?="), "café");
    }

    #[test]
    fn test_decode_q_underscore_is_space() {
        assert_eq!(
            decode_encoded_words("=?ISO-8859-1?Q?R=E9sum=E9_du_projet?="),
            "Résumé du projet"
        );
    }

    #[test]
    fn test_space_kept_before_undecodable_token() {
        // Elision only applies between two words that both decode
        assert_eq!(
            decode_encoded_words("=?UTF-8?B?SGk=?= =?bad?"),
            "Hi =?bad?"
        );
    }

    #[test]
    fn test_adjacent_encoded_words_whitespace_elided() {
        assert_eq!(
            decode_encoded_words("=?UTF-8?B?SG9sYQ==?= =?UTF-8?B?IG11bmRv?="),
            "Hola mundo"
        );
    }

    #[test]
    fn test_mixed_plain_and_encoded() {
        assert_eq!(
            decode_encoded_words("Re: =?UTF-8?B?SG9sYQ==?= there"),
            "Re: Hola there"
        );
    }

    #[test]
    fn test_invalid_encoded_word_left_verbatim() {
        // Bad base64 payload: keep the original token
        assert_eq!(
            decode_encoded_words("=?UTF-8?B?*notb64*?="),
            "=?UTF-8?B?*notb64*?="
        );
        // Unknown encoding letter
        assert_eq!(decode_encoded_words("=?UTF-8?X?abc?="), "=?UTF-8?X?abc?=");
    }

    #[test]
    fn test_encoded_word_in_parsed_header() {
        let h = parse_headers("Subject: =?UTF-8?Q?Caf=C3=A9_con_le=C3=B1a?=\n");
        assert_eq!(h.get("subject"), Some("Café con leña"));
    }

    #[test]
    fn test_windows1252_encoded_word() {
        assert_eq!(
            decode_encoded_words("=?Windows-1252?Q?M=FCller?="),
            "Müller"
        );
    }
}
