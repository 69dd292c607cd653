//! Integration tests for EML decoding: header folding, encoded words,
//! multipart splitting, attachments and inline image resolution.

use std::path::Path;

use emlshell::{parse, parse_with_diagnostics, EmlError};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let bytes = std::fs::read(&path).unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

// ─── Test 1: Simple CRLF message ────────────────────────────────────

#[test]
fn test_simple_message_headers_and_body() {
    let result = parse(&fixture("simple.eml")).unwrap();

    assert_eq!(
        result.headers.get("from"),
        Some("Alice Example <alice@example.com>")
    );
    assert_eq!(result.headers.get("subject"), Some("Quarterly report ready"));
    assert_eq!(
        result.headers.get("message-id"),
        Some("<20250113104200.1@example.com>")
    );

    // Plain text is escaped, linkified, and <br>-joined
    assert!(result.body.starts_with("Hi Bob,<br>"));
    assert!(result
        .body
        .contains("<a href=\"https://reports.example.com/q4\">"));
    assert!(result.attachments.is_empty());
    assert!(result.inline_images.is_empty());
}

// ─── Test 2: multipart/alternative picks the HTML part ──────────────

#[test]
fn test_alternative_prefers_html_part() {
    let result = parse(&fixture("multipart_alternative.eml")).unwrap();

    assert!(result.body.starts_with("<html>"));
    assert!(result.body.contains("<h1>Weekly digest</h1>"));
    // The quoted-printable plain part must not leak into the body
    assert!(!result.body.contains("=C3=A9"));
    assert!(result.attachments.is_empty());
}

// ─── Test 3: cid: reference resolved against a related image ────────

#[test]
fn test_related_image_resolved_to_data_url() {
    let result = parse(&fixture("related_cid.eml")).unwrap();

    assert_eq!(result.headers.get("subject"), Some("Fotos del viaje"));

    let image = result.inline_images.get("img1").expect("inline image");
    assert_eq!(image.content_type, "image/png");
    assert_eq!(image.payload, b"\x89PNG\r\n\x1a\n");

    assert!(result
        .body
        .contains("<img src=\"data:image/png;base64,iVBORw0KGgo=\">"));
    assert!(!result.body.contains("cid:"));
}

// ─── Test 4: attachment metadata and payload ────────────────────────

#[test]
fn test_attachment_decoded() {
    let result = parse(&fixture("attachment.eml")).unwrap();

    assert!(result.body.contains("Invoice for January"));
    assert_eq!(result.attachments.len(), 1);

    let att = &result.attachments[0];
    assert_eq!(att.filename, "invoice.pdf");
    assert_eq!(att.content_type, "application/pdf");
    assert!(!att.is_inline);
    assert!(att.payload.starts_with(b"%PDF-1.4"));
    assert_eq!(att.size, att.payload.len() as u64);
    assert!(att.data_url().starts_with("data:application/pdf;base64,"));
}

// ─── Test 5: boundary metacharacters are literal ────────────────────

#[test]
fn test_boundary_with_metacharacters() {
    let result = parse(&fixture("weird_boundary.eml")).unwrap();
    assert_eq!(result.body, "<p>And the splitter must treat it literally.</p>");
}

// ─── Test 6: encoded words and folded headers ───────────────────────

#[test]
fn test_encoded_words_in_headers() {
    let result = parse(&fixture("encoded_words.eml")).unwrap();

    assert_eq!(
        result.headers.get("from"),
        Some("José García <jose@example.com>")
    );
    assert_eq!(
        result.headers.get("to"),
        Some("María López <maria@example.com>")
    );
    // Folded subject; whitespace between adjacent encoded words elided
    assert_eq!(result.headers.get("subject"), Some("Reunión del lunes"));
    assert_eq!(
        result.headers.get("x-folded"),
        Some("first piece second piece third piece")
    );
}

// ─── Test 7: missing separator is the one fatal error ───────────────

#[test]
fn test_headers_only_message_fails() {
    let err = parse("Subject: headers only\nFrom: a@b.c\n").unwrap_err();
    assert!(matches!(err, EmlError::MissingSeparator));
}

// ─── Test 8: cid substitution is idempotent ─────────────────────────

#[test]
fn test_cid_resolution_idempotent() {
    let result = parse(&fixture("related_cid.eml")).unwrap();

    // Re-parsing a message whose body already holds the data URL must
    // leave it untouched.
    let rewrapped = format!(
        "Subject: rewrapped\nContent-Type: text/html\n\n{}\n",
        result.body
    );
    let again = parse(&rewrapped).unwrap();
    // The data URL itself is harvested as an embedded image
    assert!(again.inline_images.contains_key("embedded_0"));
    assert_eq!(again.body, result.body);
}

// ─── Test 9: diagnostics are ordered and opt-in ─────────────────────

#[test]
fn test_diagnostics_trace_multipart_walk() {
    let (result, events) = parse_with_diagnostics(&fixture("attachment.eml")).unwrap();
    assert_eq!(result.attachments.len(), 1);

    let rendered: Vec<String> = events.iter().map(ToString::to_string).collect();
    assert!(rendered.iter().any(|e| e.contains("boundary 'mix'")));
    assert!(rendered
        .iter()
        .any(|e| e.contains("attachment 'invoice.pdf'")));
}
