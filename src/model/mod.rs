//! Data model for decoded messages: headers, attachments, inline images.

pub mod attachment;
pub mod headers;
pub mod image;
pub mod message;
