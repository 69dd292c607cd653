//! File attachments extracted from a message.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A decoded file attachment.
///
/// Immutable once built by the classifier. The payload holds the
/// decoded bytes; a part whose base64 content cannot be decoded never
/// becomes an `Attachment` at all.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Attachment {
    /// Filename from `Content-Disposition: filename=` or
    /// `Content-Type: name=`, in that priority order.
    pub filename: String,

    /// MIME content type token (e.g. `"application/pdf"`).
    pub content_type: String,

    /// `true` when the disposition was `inline` rather than `attachment`.
    pub is_inline: bool,

    /// Content-ID with angle brackets stripped, if the part carried one.
    pub content_id: Option<String>,

    /// Decoded size in bytes. Always equals `payload.len()`.
    pub size: u64,

    /// Decoded binary content. Skipped in serialized output; the
    /// rendering collaborator reaches it through the struct directly.
    #[serde(skip)]
    pub payload: Vec<u8>,
}

impl Attachment {
    /// The payload as a `data:` URL, for embedding or download links.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.payload)
        )
    }
}
