//! Top-level EML parsing: newline normalization, header/body split,
//! multipart walk, body selection and image resolution.

use crate::error::{EmlError, Result};
use crate::model::message::{Diagnostic, ParseResult, Stage};
use crate::parser::classify::PartCollector;
use crate::parser::header::parse_headers;
use crate::parser::mime::PartMeta;
use crate::parser::multipart::split_parts;
use crate::parser::DiagnosticSink;
use crate::render::{body, images};

/// Only one level of nested multipart is descended into; deeper
/// nesting is treated as an opaque part.
const MAX_NESTING: usize = 1;

/// Parse a complete EML message.
///
/// The only fatal condition is a missing blank line between headers
/// and body; every other irregularity is absorbed and the parser
/// produces its best-effort result.
pub fn parse(input: &str) -> Result<ParseResult> {
    let mut sink = DiagnosticSink::new(false);
    parse_impl(input, &mut sink)
}

/// Like [`parse`], but also returns the ordered list of recovery
/// events observed while parsing.
pub fn parse_with_diagnostics(input: &str) -> Result<(ParseResult, Vec<Diagnostic>)> {
    let mut sink = DiagnosticSink::new(true);
    let result = parse_impl(input, &mut sink)?;
    Ok((result, sink.into_events()))
}

fn parse_impl(input: &str, sink: &mut DiagnosticSink) -> Result<ParseResult> {
    let text = normalize_newlines(input);
    let (header_text, body_text) = match text.split_once("\n\n") {
        Some(split) => split,
        None => return Err(EmlError::MissingSeparator),
    };

    let headers = parse_headers(header_text);
    sink.note(Stage::Headers, || {
        format!("{} headers parsed", headers.len())
    });
    let meta = PartMeta::from_headers(&headers);

    let mut collector = PartCollector::new();
    match meta.boundary.as_deref() {
        Some(boundary) => collect_multipart(body_text, boundary, &mut collector, 0, sink),
        None => collector.push(&meta, body_text, sink),
    }

    let classified = collector.finish();
    let mut inline_images = classified.images;

    // A declared text/plain body is always escaped; only an untyped
    // fallback gets sniffed for pre-existing markup.
    let body_html = match (classified.html, classified.text, classified.fallback_text) {
        (Some(html), _, _) => html,
        (None, Some(text), _) => body::text_to_html(&text),
        (None, None, Some(text)) if body::looks_like_html(&text) => text,
        (None, None, Some(text)) => body::text_to_html(&text),
        (None, None, None) => {
            sink.note(Stage::Body, || "no displayable part, using raw body".to_string());
            body_text.to_string()
        }
    };

    images::extract_embedded(&body_html, &mut inline_images, sink);
    let body_html = images::resolve_cids(&body_html, &inline_images);

    Ok(ParseResult {
        headers,
        body: body_html,
        attachments: classified.attachments,
        inline_images,
    })
}

/// Walk one multipart body: split on the boundary, parse each part's
/// header block, then either descend into a nested multipart or hand
/// the part to the collector.
fn collect_multipart(
    body: &str,
    boundary: &str,
    collector: &mut PartCollector,
    depth: usize,
    sink: &mut DiagnosticSink,
) {
    let parts = split_parts(body, boundary);
    sink.note(Stage::Multipart, || {
        format!("boundary '{boundary}': {} parts", parts.len())
    });

    for part in parts {
        let Some(separator) = part.find("\n\n") else {
            sink.note(Stage::Multipart, || {
                "part without header/body separator skipped".to_string()
            });
            continue;
        };
        let part_headers = parse_headers(&part[..separator]);
        let part_body = &part[separator + 2..];
        let part_meta = PartMeta::from_headers(&part_headers);

        match part_meta.boundary.as_deref() {
            Some(nested) if depth < MAX_NESTING => {
                collect_multipart(part_body, nested, collector, depth + 1, sink);
            }
            _ => collector.push(&part_meta, part_body, sink),
        }
    }
}

fn normalize_newlines(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}
