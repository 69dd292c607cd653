//! Inline images referenced from the message body.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// An inline image, keyed by content-id in [`crate::model::message::ParseResult`].
///
/// Two provenances share this shape: declared `image/*` MIME parts,
/// and images the body scanner finds already embedded as `data:` URLs
/// (those get generated `embedded_<n>` keys).
#[derive(Debug, Clone, serde::Serialize)]
pub struct InlineImage {
    /// The table key: a Content-ID, a disposition filename, or a
    /// generated `image_part_<n>` / `embedded_<n>` identifier.
    pub content_id: String,

    /// MIME content type token (e.g. `"image/png"`).
    pub content_type: String,

    /// Decoded image bytes. Skipped in serialized output.
    #[serde(skip)]
    pub payload: Vec<u8>,
}

impl InlineImage {
    /// The image as a `data:` URL, ready to substitute for a `cid:` reference.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.payload)
        )
    }
}
