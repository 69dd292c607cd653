//! MIME metadata extraction: a pure function from a header map to the
//! fields the rest of the pipeline needs. Absent fields yield
//! well-defined defaults, never errors.

use crate::model::headers::HeaderMap;

/// Content-Transfer-Encoding values (RFC 2045 §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TransferEncoding {
    /// 7-bit ASCII (the default, identity).
    SevenBit,
    /// 8-bit bytes, identity.
    EightBit,
    /// Raw binary, identity.
    Binary,
    /// Base64.
    Base64,
    /// Quoted-Printable.
    QuotedPrintable,
}

impl TransferEncoding {
    /// Parse a header value; anything unrecognized is treated as 7bit.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "8bit" => Self::EightBit,
            "binary" => Self::Binary,
            _ => Self::SevenBit,
        }
    }
}

impl Default for TransferEncoding {
    fn default() -> Self {
        Self::SevenBit
    }
}

/// Metadata derived from one part's headers.
#[derive(Debug, Clone, Default)]
pub struct PartMeta {
    /// Lower-cased MIME type token (before `;`), empty when absent.
    pub content_type: String,
    /// `boundary=` parameter of Content-Type, quotes stripped.
    pub boundary: Option<String>,
    /// Lower-cased Content-Disposition value, `None` when absent.
    pub disposition: Option<String>,
    /// Transfer encoding, defaulting to identity.
    pub transfer_encoding: TransferEncoding,
    /// Content-ID with surrounding angle brackets stripped.
    pub content_id: Option<String>,
    /// `charset=` parameter of Content-Type, defaulting to `utf-8`.
    pub charset: String,
    /// `filename=` from Content-Disposition, else `name=` from
    /// Content-Type.
    pub filename: Option<String>,
}

impl PartMeta {
    /// Derive part metadata from a header map.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let content_type_raw = headers.get("content-type").unwrap_or("");
        let content_type = mime_token(content_type_raw);
        let boundary = header_param(content_type_raw, "boundary");
        let charset =
            header_param(content_type_raw, "charset").unwrap_or_else(|| "utf-8".to_string());

        let disposition = headers
            .get("content-disposition")
            .map(|d| d.to_lowercase());

        let transfer_encoding = headers
            .get("content-transfer-encoding")
            .map(TransferEncoding::parse)
            .unwrap_or_default();

        let content_id = headers.get("content-id").map(strip_angle_brackets);

        let filename = headers
            .get("content-disposition")
            .and_then(|d| header_param(d, "filename"))
            .or_else(|| header_param(content_type_raw, "name"));

        Self {
            content_type,
            boundary,
            disposition,
            transfer_encoding,
            content_id,
            charset,
            filename,
        }
    }

    /// Whether the disposition mentions `token` (case-insensitive;
    /// disposition is stored lower-cased).
    pub fn disposition_mentions(&self, token: &str) -> bool {
        self.disposition
            .as_deref()
            .is_some_and(|d| d.contains(token))
    }
}

/// The `type/subtype` token of a Content-Type value, lower-cased.
fn mime_token(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Extract a `key=value` parameter from a `;`-separated header value.
///
/// Matching is case-insensitive on the key; surrounding single or
/// double quotes on the value are stripped.
fn header_param(value: &str, key: &str) -> Option<String> {
    for segment in value.split(';').skip(1) {
        let Some((k, v)) = segment.split_once('=') else {
            continue;
        };
        if k.trim().eq_ignore_ascii_case(key) {
            let v = v.trim().trim_matches(|c| c == '"' || c == '\'');
            if v.is_empty() {
                return None;
            }
            return Some(v.to_string());
        }
    }
    None
}

/// Strip `<` and `>` around a Content-ID value.
fn strip_angle_brackets(s: &str) -> String {
    s.trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_of(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(*k, *v);
        }
        h
    }

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("BASE64"), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse(" quoted-printable "),
            TransferEncoding::QuotedPrintable
        );
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse("bogus"), TransferEncoding::SevenBit);
    }

    #[test]
    fn test_boundary_and_charset() {
        let h = headers_of(&[(
            "content-type",
            "multipart/mixed; boundary=\"----=_Part_123\"; charset=ISO-8859-1",
        )]);
        let meta = PartMeta::from_headers(&h);
        assert_eq!(meta.content_type, "multipart/mixed");
        assert_eq!(meta.boundary.as_deref(), Some("----=_Part_123"));
        assert_eq!(meta.charset, "ISO-8859-1");
    }

    #[test]
    fn test_defaults_when_absent() {
        let meta = PartMeta::from_headers(&HeaderMap::new());
        assert_eq!(meta.content_type, "");
        assert_eq!(meta.boundary, None);
        assert_eq!(meta.charset, "utf-8");
        assert_eq!(meta.transfer_encoding, TransferEncoding::SevenBit);
        assert_eq!(meta.filename, None);
    }

    #[test]
    fn test_content_id_brackets_stripped() {
        let h = headers_of(&[("content-id", "<img1@mailer>")]);
        let meta = PartMeta::from_headers(&h);
        assert_eq!(meta.content_id.as_deref(), Some("img1@mailer"));
    }

    #[test]
    fn test_filename_priority() {
        // Disposition filename wins over Content-Type name
        let h = headers_of(&[
            ("content-type", "application/pdf; name=\"fromtype.pdf\""),
            (
                "content-disposition",
                "attachment; filename=\"report.pdf\"",
            ),
        ]);
        let meta = PartMeta::from_headers(&h);
        assert_eq!(meta.filename.as_deref(), Some("report.pdf"));

        let h = headers_of(&[("content-type", "application/pdf; name=\"fromtype.pdf\"")]);
        let meta = PartMeta::from_headers(&h);
        assert_eq!(meta.filename.as_deref(), Some("fromtype.pdf"));
    }

    #[test]
    fn test_disposition_lowercased() {
        let h = headers_of(&[("content-disposition", "ATTACHMENT; filename=\"a.bin\"")]);
        let meta = PartMeta::from_headers(&h);
        assert!(meta.disposition_mentions("attachment"));
        assert!(!meta.disposition_mentions("inline"));
    }
}
