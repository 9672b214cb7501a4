use std::path::Path;
use std::sync::Arc;

use super::common::{ErrorTolerance, MarkerSet, TreeSitterParser};
use super::ImportAnalyzer;
use crate::core::error::Result;

/// TypeScript flavour handled by [`TypeScriptParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeScriptDialect {
    /// `.ts`, `.mts`, `.cts`
    TypeScript,
    /// `.tsx`: TypeScript with JSX
    Tsx,
}

pub struct TypeScriptParser {
    dialect: TypeScriptDialect,
    markers: Arc<MarkerSet>,
}

impl TypeScriptParser {
    pub fn new(dialect: TypeScriptDialect, markers: Arc<MarkerSet>) -> Self {
        Self { dialect, markers }
    }

    fn tree_sitter(&self) -> Result<TreeSitterParser> {
        match self.dialect {
            TypeScriptDialect::TypeScript => {
                TreeSitterParser::new(tree_sitter_typescript::language_typescript(), "typescript")
            }
            TypeScriptDialect::Tsx => {
                TreeSitterParser::new(tree_sitter_typescript::language_tsx(), "tsx")
            }
        }
    }
}

impl ImportAnalyzer for TypeScriptParser {
    fn imports_marker(&self, file_path: &Path, source: &[u8]) -> Result<bool> {
        // tree_sitter::Parser is not Sync; one per call keeps the analyzer shareable.
        let mut parser = self.tree_sitter()?;
        parser.scan_markers(source, file_path, &self.markers, ErrorTolerance::Strict)
    }

    fn language_name(&self) -> &str {
        match self.dialect {
            TypeScriptDialect::TypeScript => "typescript",
            TypeScriptDialect::Tsx => "tsx",
        }
    }
}
