pub mod common;
pub mod embedded;
pub mod javascript;
pub mod typescript;

use std::path::Path;
use std::sync::Arc;

use crate::core::error::Result;

pub use common::MarkerSet;
pub use embedded::{EmbeddedKind, EmbeddedParser};
pub use javascript::JavaScriptParser;
pub use typescript::{TypeScriptDialect, TypeScriptParser};

/// Decides whether a source file statically imports one of the marker modules.
pub trait ImportAnalyzer {
    /// Parses `source` and reports whether it imports a marker module.
    ///
    /// A marker import found in the error-recovered tree always counts. Script
    /// analyzers report `DiscoveryError::Parse` for a file with syntax errors
    /// and no marker import; embedded analyzers never do.
    fn imports_marker(&self, file_path: &Path, source: &[u8]) -> Result<bool>;
    fn language_name(&self) -> &str;
}

/// Source language of a file, from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    TypeScript,
    Tsx,
    JavaScript,
    Astro,
    Mdx,
    /// No known extension; read as TSX without failing on syntax errors.
    Other,
}

impl SourceLanguage {
    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        match extension {
            "ts" | "mts" | "cts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "astro" => Self::Astro,
            "mdx" => Self::Mdx,
            _ => Self::Other,
        }
    }
}

/// Hands out one analyzer per source language, all sharing the same markers.
pub struct ParserFactory {
    typescript: TypeScriptParser,
    tsx: TypeScriptParser,
    javascript: JavaScriptParser,
    astro: EmbeddedParser,
    mdx: EmbeddedParser,
    other: EmbeddedParser,
}

impl ParserFactory {
    pub fn new(markers: MarkerSet) -> Self {
        let markers = Arc::new(markers);
        Self {
            typescript: TypeScriptParser::new(TypeScriptDialect::TypeScript, Arc::clone(&markers)),
            tsx: TypeScriptParser::new(TypeScriptDialect::Tsx, Arc::clone(&markers)),
            javascript: JavaScriptParser::new(Arc::clone(&markers)),
            astro: EmbeddedParser::new(EmbeddedKind::Astro, Arc::clone(&markers)),
            mdx: EmbeddedParser::new(EmbeddedKind::Mdx, Arc::clone(&markers)),
            other: EmbeddedParser::new(EmbeddedKind::Other, markers),
        }
    }

    pub fn get_parser(&self, language: SourceLanguage) -> &(dyn ImportAnalyzer + Send + Sync) {
        match language {
            SourceLanguage::TypeScript => &self.typescript,
            SourceLanguage::Tsx => &self.tsx,
            SourceLanguage::JavaScript => &self.javascript,
            SourceLanguage::Astro => &self.astro,
            SourceLanguage::Mdx => &self.mdx,
            SourceLanguage::Other => &self.other,
        }
    }

    pub fn for_path(&self, path: &Path) -> &(dyn ImportAnalyzer + Send + Sync) {
        self.get_parser(SourceLanguage::from_path(path))
    }
}
