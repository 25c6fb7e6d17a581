// src/extract/mod.rs
// =============================================================================
// This module finds outgoing references in downloaded pages.
//
// Submodules:
// - html: the scraper-based extractor used by the binary
//
// A reference is either a Link (<a href>, always followed) or an Asset
// (<img src>, <script src>, <link href>, followed only with --assets).
// =============================================================================

mod html;

pub use html::HtmlExtractor;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Link,
    Asset,
}

/// A reference exactly as written in the page (not yet resolved)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub raw: String,
}

#[cfg(test)]
impl Reference {
    pub fn link(raw: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Link,
            raw: raw.into(),
        }
    }

    pub fn asset(raw: impl Into<String>) -> Self {
        Self {
            kind: ReferenceKind::Asset,
            raw: raw.into(),
        }
    }
}

pub trait ReferenceExtractor: Send + Sync {
    fn extract(&self, content: &[u8]) -> Result<Vec<Reference>, ParseError>;
}
