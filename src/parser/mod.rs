//! EML parsing: header scanning, MIME metadata, multipart splitting,
//! content decoding, and part classification.

pub(crate) mod classify;
pub mod decode;
pub mod eml;
pub mod header;
pub mod mime;
pub mod multipart;

use crate::model::message::{Diagnostic, Stage};

/// Collector for decode-step annotations.
///
/// When disabled, [`DiagnosticSink::note`] never evaluates its detail
/// closure, so the plain `parse` path does no extra allocation.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticSink {
    enabled: bool,
    events: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub(crate) fn note(&mut self, stage: Stage, detail: impl FnOnce() -> String) {
        if self.enabled {
            self.events.push(Diagnostic {
                stage,
                detail: detail(),
            });
        }
    }

    pub(crate) fn into_events(self) -> Vec<Diagnostic> {
        self.events
    }
}
