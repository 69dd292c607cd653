//! Part classification: each raw part becomes an HTML body candidate,
//! a plain-text body candidate, an inline image, an attachment, or is
//! ignored. The decision order is load-bearing; see
//! [`PartCollector::push`].

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::attachment::Attachment;
use crate::model::image::InlineImage;
use crate::model::message::Stage;
use crate::parser::decode;
use crate::parser::mime::{PartMeta, TransferEncoding};
use crate::parser::DiagnosticSink;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Accumulates classified parts across one multipart walk.
#[derive(Debug, Default)]
pub struct PartCollector {
    html: Option<String>,
    text: Option<String>,
    fallback_text: Option<String>,
    attachments: Vec<Attachment>,
    images: BTreeMap<String, InlineImage>,
    index: usize,
}

/// Final output of classification.
#[derive(Debug)]
pub struct Classified {
    /// First `text/html` body, decoded.
    pub html: Option<String>,
    /// First declared `text/plain` body, decoded. Always gets escaped
    /// on render.
    pub text: Option<String>,
    /// First untyped text-like part, decoded. Used only when no
    /// declared body exists; a multipart preamble lands here and must
    /// never shadow a real `text/plain` part.
    pub fallback_text: Option<String>,
    /// Attachments in part order.
    pub attachments: Vec<Attachment>,
    /// Inline images keyed by resolved content-id.
    pub images: BTreeMap<String, InlineImage>,
}

impl PartCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one part. First match wins:
    /// 1. `text/html` body (first such part kept)
    /// 2. `text/plain` body (first kept)
    /// 3. inline image (`image/*`, image disposition, or octet-stream
    ///    with an image filename)
    /// 4. attachment (disposition `attachment`, or `inline` with a
    ///    filename)
    /// 5. fallback plain body for untyped/text-like parts
    /// 6. ignored
    pub fn push(&mut self, meta: &PartMeta, raw_body: &str, sink: &mut DiagnosticSink) {
        let index = self.index;
        self.index += 1;

        if meta.content_type.starts_with("text/html") {
            if self.html.is_none() {
                let decoded =
                    decode::decode_text(raw_body, meta.transfer_encoding, &meta.charset);
                sink.note(Stage::Classify, || {
                    format!("part {index}: html body ({} chars)", decoded.len())
                });
                self.html = Some(decoded.trim().to_string());
            } else {
                sink.note(Stage::Classify, || {
                    format!("part {index}: extra html body ignored")
                });
            }
            return;
        }

        if meta.content_type.starts_with("text/plain") {
            if self.text.is_none() {
                let decoded =
                    decode::decode_text(raw_body, meta.transfer_encoding, &meta.charset);
                sink.note(Stage::Classify, || {
                    format!("part {index}: text body ({} chars)", decoded.len())
                });
                self.text = Some(decoded.trim().to_string());
            } else {
                sink.note(Stage::Classify, || {
                    format!("part {index}: extra text body ignored")
                });
            }
            return;
        }

        if self.is_image_part(meta) {
            self.push_image(meta, raw_body, index, sink);
            return;
        }

        if meta.disposition_mentions("attachment")
            || (meta.disposition_mentions("inline") && meta.filename.is_some())
        {
            self.push_attachment(meta, raw_body, index, sink);
            return;
        }

        if (meta.content_type.is_empty() || meta.content_type.contains("text"))
            && self.text.is_none()
            && self.fallback_text.is_none()
        {
            let decoded = decode::decode_text(raw_body, meta.transfer_encoding, &meta.charset);
            let trimmed = decoded.trim();
            if !trimmed.is_empty() {
                sink.note(Stage::Classify, || {
                    format!("part {index}: fallback text body ({} chars)", trimmed.len())
                });
                self.fallback_text = Some(trimmed.to_string());
                return;
            }
        }

        sink.note(Stage::Classify, || {
            format!("part {index}: ignored ({})", meta.content_type)
        });
    }

    pub fn finish(self) -> Classified {
        Classified {
            html: self.html,
            text: self.text,
            fallback_text: self.fallback_text,
            attachments: self.attachments,
            images: self.images,
        }
    }

    fn is_image_part(&self, meta: &PartMeta) -> bool {
        if meta.content_type.starts_with("image/") || meta.disposition_mentions("image") {
            return true;
        }
        meta.content_type == "application/octet-stream"
            && meta.filename.as_deref().is_some_and(has_image_extension)
    }

    fn push_image(&mut self, meta: &PartMeta, raw_body: &str, index: usize, sink: &mut DiagnosticSink) {
        // Stable key: Content-ID, else disposition filename, else generated
        let key = meta
            .content_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| meta.filename.clone())
            .unwrap_or_else(|| format!("image_part_{index}"));

        if meta.transfer_encoding != TransferEncoding::Base64 {
            sink.note(Stage::Classify, || {
                format!("part {index}: image '{key}' skipped, not base64")
            });
            return;
        }

        match decode::decode_base64(raw_body) {
            Ok(payload) => {
                let content_type = if meta.content_type.is_empty() {
                    "image/jpeg".to_string()
                } else {
                    meta.content_type.clone()
                };
                sink.note(Stage::Classify, || {
                    format!("part {index}: inline image '{key}' ({content_type}, {} bytes)", payload.len())
                });
                // Last write wins on key collision
                self.images.insert(
                    key.clone(),
                    InlineImage {
                        content_id: key,
                        content_type,
                        payload,
                    },
                );
            }
            Err(e) => {
                debug!(error = %e, key = %key, "invalid base64 for inline image");
                sink.note(Stage::Decode, || {
                    format!("part {index}: invalid base64 for image '{key}'")
                });
            }
        }
    }

    fn push_attachment(&mut self, meta: &PartMeta, raw_body: &str, index: usize, sink: &mut DiagnosticSink) {
        let Some(filename) = meta.filename.clone() else {
            sink.note(Stage::Classify, || {
                format!("part {index}: attachment dropped, no filename")
            });
            return;
        };

        let payload = match decode::decode_transfer(raw_body, meta.transfer_encoding) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, filename = %filename, "invalid base64 for attachment");
                sink.note(Stage::Decode, || {
                    format!("part {index}: invalid base64 for attachment '{filename}'")
                });
                return;
            }
        };

        sink.note(Stage::Classify, || {
            format!("part {index}: attachment '{filename}' ({} bytes)", payload.len())
        });
        self.attachments.push(Attachment {
            filename,
            content_type: meta.content_type.clone(),
            is_inline: meta.disposition_mentions("inline"),
            content_id: meta.content_id.clone().filter(|id| !id.is_empty()),
            size: payload.len() as u64,
            payload,
        });
    }
}

fn has_image_extension(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}
