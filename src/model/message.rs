//! The parse result and the optional diagnostics channel.

use std::collections::BTreeMap;

use super::attachment::Attachment;
use super::headers::HeaderMap;
use super::image::InlineImage;

/// Everything decoded from one EML message.
///
/// Built in a single synchronous parse call and immutable afterwards.
/// The body string is render-ready: HTML as delivered, or plain text
/// escaped and linkified, with `cid:` references already substituted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParseResult {
    /// Decoded top-level headers.
    pub headers: HeaderMap,

    /// Render-ready message body.
    pub body: String,

    /// File attachments in part order.
    pub attachments: Vec<Attachment>,

    /// Inline images keyed by content-id. Last write wins on collision.
    pub inline_images: BTreeMap<String, InlineImage>,
}

/// Pipeline stage a diagnostic was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Stage {
    /// Header block scanning and encoded-word decoding.
    Headers,
    /// Boundary splitting.
    Multipart,
    /// Transfer-encoding and charset decoding.
    Decode,
    /// Part classification.
    Classify,
    /// Body assembly and cid resolution.
    Body,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Headers => "headers",
            Self::Multipart => "multipart",
            Self::Decode => "decode",
            Self::Classify => "classify",
            Self::Body => "body",
        };
        write!(f, "{name}")
    }
}

/// One decode-step annotation.
///
/// Diagnostics are an ordered trace of what the parser did and what it
/// dropped. Collecting them never changes the parse outcome; callers
/// that do not ask for them pay nothing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Diagnostic {
    /// Where in the pipeline the event happened.
    pub stage: Stage,
    /// Human-readable detail.
    pub detail: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.stage, self.detail)
    }
}
