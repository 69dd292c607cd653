//! Image plumbing for the rendered body: harvest `data:` URL images
//! embedded in HTML and rewrite `cid:` references to `data:` URLs.

use std::collections::BTreeMap;

use crate::model::image::InlineImage;
use crate::model::message::Stage;
use crate::parser::decode;
use crate::parser::DiagnosticSink;

/// Scans an HTML body for `<img src="data:...;base64,...">` tags and
/// adds each decodable payload to the image table under an
/// `embedded_<n>` key. The HTML itself is left untouched.
pub(crate) fn extract_embedded(
    html: &str,
    images: &mut BTreeMap<String, InlineImage>,
    sink: &mut DiagnosticSink,
) {
    // Lowercased copy shares byte offsets with the original, so tag
    // scanning is case-insensitive while payload slices stay exact.
    let lower = html.to_ascii_lowercase();
    let mut counter = 0usize;
    let mut at = 0usize;

    while let Some(rel) = lower[at..].find("<img") {
        let tag_start = at + rel;
        let Some(tag_len) = lower[tag_start..].find('>') else {
            break;
        };
        at = tag_start + tag_len + 1;

        let Some(src) = attr_value(&lower[tag_start..tag_start + tag_len], "src=") else {
            continue;
        };
        let (val_start, val_end) = src;
        let value = &html[tag_start + val_start..tag_start + val_end];
        let value_lower = &lower[tag_start + val_start..tag_start + val_end];

        // Scheme and marker match case-insensitively via the lowercased
        // copy; the payload slice comes from the original string since
        // base64 is case-sensitive.
        if !value_lower.starts_with("data:") {
            continue;
        }
        let data = &value["data:".len()..];
        let data_lower = &value_lower["data:".len()..];

        let Some(marker) = data_lower.find(";base64,") else {
            sink.note(Stage::Body, || {
                "embedded image skipped: not a base64 data url".to_string()
            });
            continue;
        };
        // Extra parameters (name=, charset=) end the mime token early
        let mime = data_lower[..marker].split(';').next().unwrap_or("").trim();
        let payload = &data[marker + ";base64,".len()..];

        match decode::decode_base64(payload) {
            Ok(bytes) => {
                let key = format!("embedded_{counter}");
                counter += 1;
                let content_type = if mime.is_empty() {
                    "image/jpeg".to_string()
                } else {
                    mime.to_string()
                };
                sink.note(Stage::Body, || {
                    format!("embedded image '{key}' ({content_type}, {} bytes)", bytes.len())
                });
                images.insert(
                    key.clone(),
                    InlineImage {
                        content_id: key,
                        content_type,
                        payload: bytes,
                    },
                );
            }
            Err(_) => {
                sink.note(Stage::Body, || {
                    "embedded image skipped: invalid base64 payload".to_string()
                });
            }
        }
    }
}

/// Rewrites `cid:<id>` references in the HTML body to the matching
/// image's `data:` URL. Unmatched references are left alone, and the
/// rewrite is idempotent: replaced output contains no `cid:` for a
/// known id, and a second pass is a no-op.
pub fn resolve_cids(html: &str, images: &BTreeMap<String, InlineImage>) -> String {
    let mut out = html.to_string();
    for (id, image) in images {
        if !out.contains("cid:") {
            break;
        }
        out = replace_cid(&out, id, &image.data_url());
    }
    out
}

/// Replaces each occurrence of `cid:<id>` whose next character cannot
/// extend the id. The boundary check keeps `cid:img1` from matching the
/// prefix of `cid:img10`.
fn replace_cid(html: &str, id: &str, data_url: &str) -> String {
    let needle = format!("cid:{id}");
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(pos) = rest.find(&needle) {
        let after = rest[pos + needle.len()..].chars().next();
        if after.is_none_or(|c| !is_id_char(c)) {
            out.push_str(&rest[..pos]);
            out.push_str(data_url);
        } else {
            out.push_str(&rest[..pos + needle.len()]);
        }
        rest = &rest[pos + needle.len()..];
    }
    out.push_str(rest);
    out
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@')
}

/// Locates `src=` inside one tag and returns the quoted value's byte
/// range relative to the tag start.
fn attr_value(tag: &str, attr: &str) -> Option<(usize, usize)> {
    let key = tag.find(attr)?;
    let after = key + attr.len();
    let quote = tag[after..].chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let val_start = after + 1;
    let val_len = tag[val_start..].find(quote)?;
    Some((val_start, val_start + val_len))
}
