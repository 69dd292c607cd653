//! `emlShell` — a terminal EML message decoder.
//!
//! This crate provides the core library for parsing EML files: header
//! decoding, multipart splitting, transfer-encoding and charset
//! decoding, and assembly of a render-ready HTML body with inline
//! images resolved.

pub mod error;
pub mod model;
pub mod parser;
pub mod render;

pub use error::{EmlError, Result};
pub use model::attachment::Attachment;
pub use model::headers::HeaderMap;
pub use model::image::InlineImage;
pub use model::message::{Diagnostic, ParseResult, Stage};
pub use parser::eml::{parse, parse_with_diagnostics};
