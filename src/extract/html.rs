// src/extract/html.rs
// =============================================================================
// This module extracts references from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// html5ever recovers from broken markup, so the only content we refuse is
// content that is not UTF-8 text at all.
// =============================================================================

use super::{Reference, ReferenceExtractor, ReferenceKind};
use crate::error::ParseError;
use scraper::{Html, Selector};

// (selector, attribute, kind) for every element we follow
const TARGETS: [(&str, &str, ReferenceKind); 4] = [
    ("a[href]", "href", ReferenceKind::Link),
    ("img[src]", "src", ReferenceKind::Asset),
    ("script[src]", "src", ReferenceKind::Asset),
    ("link[href]", "href", ReferenceKind::Asset),
];

pub struct HtmlExtractor {
    selector: Selector,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        let joined = TARGETS
            .iter()
            .map(|(selector, _, _)| *selector)
            .collect::<Vec<_>>()
            .join(", ");

        // The selector list is a constant, so parsing cannot fail at runtime
        let selector = Selector::parse(&joined).expect("reference selectors are valid CSS");
        Self { selector }
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceExtractor for HtmlExtractor {
    fn extract(&self, content: &[u8]) -> Result<Vec<Reference>, ParseError> {
        let text = std::str::from_utf8(content).map_err(|e| ParseError::InvalidEncoding {
            offset: e.valid_up_to(),
        })?;

        let document = Html::parse_document(text);
        let mut references = Vec::new();

        // One combined selector keeps document order across element types
        for element in document.select(&self.selector) {
            let name = element.value().name();
            let Some((_, attr, kind)) = TARGETS
                .iter()
                .find(|(selector, _, _)| selector.split('[').next() == Some(name))
            else {
                continue;
            };

            if let Some(value) = element.value().attr(attr) {
                let raw = value.trim();
                if !raw.is_empty() {
                    references.push(Reference {
                        kind: *kind,
                        raw: raw.to_string(),
                    });
                }
            }
        }

        Ok(references)
    }
}
