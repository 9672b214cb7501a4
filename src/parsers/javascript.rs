use std::path::Path;
use std::sync::Arc;

use super::common::{ErrorTolerance, MarkerSet, TreeSitterParser};
use super::ImportAnalyzer;
use crate::core::error::Result;

/// `.js`, `.jsx`, `.mjs` and `.cjs` sources; the grammar understands JSX.
pub struct JavaScriptParser {
    markers: Arc<MarkerSet>,
}

impl JavaScriptParser {
    pub fn new(markers: Arc<MarkerSet>) -> Self {
        Self { markers }
    }
}

impl ImportAnalyzer for JavaScriptParser {
    fn imports_marker(&self, file_path: &Path, source: &[u8]) -> Result<bool> {
        let mut parser = TreeSitterParser::new(tree_sitter_javascript::language(), "javascript")?;
        parser.scan_markers(source, file_path, &self.markers, ErrorTolerance::Strict)
    }

    fn language_name(&self) -> &str {
        "javascript"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsx_component_with_marker_import() {
        let markers = Arc::new(MarkerSet::new(["@builder.io/qwik-react"]));
        let source = br#"import { qwikify$ } from "@builder.io/qwik-react";
import { Slider } from "./slider.jsx";
export const QSlider = qwikify$(() => <Slider min={0} />);
"#;
        let js = JavaScriptParser::new(markers);
        assert!(js.imports_marker(Path::new("slider.jsx"), source).unwrap());
    }

    #[test]
    fn require_call_is_not_an_import() {
        let markers = Arc::new(MarkerSet::new(["@builder.io/qwik"]));
        let source = br#"const qwik = require("@builder.io/qwik");
module.exports = qwik;
"#;
        let js = JavaScriptParser::new(markers);
        assert!(!js.imports_marker(Path::new("legacy.cjs"), source).unwrap());
    }
}
