//! Boundary-based multipart splitting.
//!
//! Boundaries are caller-supplied, untrusted strings; splitting is a
//! literal substring scan, so pattern metacharacters (`.`, `+`, `*`)
//! need no escaping and can never change the match.

/// Split a body into raw part fragments on `--<boundary>`.
///
/// The terminal marker `--<boundary>--` is consumed the same way, its
/// trailing `--` swallowed. Fragments that trim to nothing or to a
/// bare `--` are discarded. An absent delimiter yields a single
/// fragment unless the whole body trims to empty.
pub fn split_parts<'a>(body: &'a str, boundary: &str) -> Vec<&'a str> {
    let delimiter = format!("--{boundary}");
    let mut fragments = Vec::new();
    let mut rest = body;

    while let Some(pos) = rest.find(&delimiter) {
        fragments.push(&rest[..pos]);
        rest = &rest[pos + delimiter.len()..];
        // Terminal marker
        if let Some(after) = rest.strip_prefix("--") {
            rest = after;
        }
    }
    fragments.push(rest);

    fragments
        .into_iter()
        .filter(|f| {
            let trimmed = f.trim();
            !trimmed.is_empty() && trimmed != "--"
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_two_parts() {
        let body = "preamble\n--XYZ\npart one\n--XYZ\npart two\n--XYZ--\n";
        let parts = split_parts(body, "XYZ");
        assert_eq!(parts.len(), 3); // preamble counts as a fragment
        assert!(parts[1].contains("part one"));
        assert!(parts[2].contains("part two"));
    }

    #[test]
    fn test_terminal_marker_swallowed() {
        let body = "--B\ncontent\n--B--\n";
        let parts = split_parts(body, "B");
        assert_eq!(parts.len(), 1);
        assert!(parts[0].contains("content"));
    }

    #[test]
    fn test_metacharacter_boundary_is_literal() {
        let body = "--a.b+c*d\nfirst\n--a.b+c*d\nsecond\n--a.b+c*d--\n";
        let parts = split_parts(body, "a.b+c*d");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].trim(), "first");
        assert_eq!(parts[1].trim(), "second");
    }

    #[test]
    fn test_boundary_absent_yields_whole_body() {
        let parts = split_parts("no delimiters here", "XYZ");
        assert_eq!(parts, vec!["no delimiters here"]);
    }

    #[test]
    fn test_empty_fragments_discarded() {
        let body = "--B\n\n   \n--B\nreal\n--B--";
        let parts = split_parts(body, "B");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].trim(), "real");
    }

    #[test]
    fn test_whitespace_only_body_yields_nothing() {
        assert!(split_parts("  \n ", "B").is_empty());
    }
}
