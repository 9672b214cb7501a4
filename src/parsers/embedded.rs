use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use super::common::{ErrorTolerance, MarkerSet, TreeSitterParser};
use super::ImportAnalyzer;
use crate::core::error::Result;

/// Files whose script content is only part of the file, or whose extension
/// says nothing about the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedKind {
    /// `.astro`: TypeScript between the leading `---` fences.
    Astro,
    /// `.mdx`: top-level `import`/`export` blocks between markdown paragraphs.
    Mdx,
    /// Anything else, read as TSX.
    Other,
}

/// Analyzer for sources that are not plain script files.
///
/// The script part is extracted first and parsed leniently: syntax errors
/// never fail discovery, they only mean the file does not match.
pub struct EmbeddedParser {
    kind: EmbeddedKind,
    markers: Arc<MarkerSet>,
}

impl EmbeddedParser {
    pub fn new(kind: EmbeddedKind, markers: Arc<MarkerSet>) -> Self {
        Self { kind, markers }
    }

    fn script<'a>(&self, source: &'a [u8]) -> Option<std::borrow::Cow<'a, [u8]>> {
        match self.kind {
            EmbeddedKind::Astro => astro_frontmatter(source).map(Into::into),
            EmbeddedKind::Mdx => {
                let esm = mdx_esm(source);
                (!esm.is_empty()).then(|| esm.into())
            }
            // Binary files carry no imports.
            EmbeddedKind::Other => std::str::from_utf8(source).ok().map(|_| source.into()),
        }
    }
}

impl ImportAnalyzer for EmbeddedParser {
    fn imports_marker(&self, file_path: &Path, source: &[u8]) -> Result<bool> {
        let Some(script) = self.script(source) else {
            trace!(file = %file_path.display(), "no script content");
            return Ok(false);
        };

        let mut parser = match self.kind {
            EmbeddedKind::Astro => {
                TreeSitterParser::new(tree_sitter_typescript::language_typescript(), "typescript")?
            }
            EmbeddedKind::Mdx | EmbeddedKind::Other => {
                TreeSitterParser::new(tree_sitter_typescript::language_tsx(), "tsx")?
            }
        };
        parser.scan_markers(&script, file_path, &self.markers, ErrorTolerance::Lenient)
    }

    fn language_name(&self) -> &str {
        match self.kind {
            EmbeddedKind::Astro => "astro",
            EmbeddedKind::Mdx => "mdx",
            EmbeddedKind::Other => "tsx",
        }
    }
}

fn lines(source: &[u8]) -> impl Iterator<Item = &[u8]> {
    source.split(|&b| b == b'\n').map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

fn is_fence(line: &[u8]) -> bool {
    line.trim_ascii_end() == b"---"
}

/// Frontmatter of an Astro component: the lines between an opening `---`
/// (after optional blank lines) and the next `---`.
fn astro_frontmatter(source: &[u8]) -> Option<&[u8]> {
    let mut offset = 0;
    let mut start = None;
    for line in source.split_inclusive(|&b| b == b'\n') {
        let text = line.strip_suffix(b"\n").unwrap_or(line);
        let text = text.strip_suffix(b"\r").unwrap_or(text);
        match start {
            None if text.trim_ascii().is_empty() => {}
            None if is_fence(text) => start = Some(offset + line.len()),
            None => return None,
            Some(begin) if is_fence(text) => return Some(&source[begin..offset]),
            Some(_) => {}
        }
        offset += line.len();
    }
    None
}

fn is_esm_start(line: &[u8]) -> bool {
    line.starts_with(b"import ")
        || line.starts_with(b"import{")
        || line.starts_with(b"import'")
        || line.starts_with(b"import\"")
        || line.starts_with(b"export ")
}

fn is_code_fence(line: &[u8]) -> bool {
    let trimmed = line.trim_ascii_start();
    trimmed.starts_with(b"```") || trimmed.starts_with(b"~~~")
}

/// ESM blocks of an MDX document, joined with newlines.
///
/// A block starts with a line beginning with `import`/`export` at a paragraph
/// boundary and runs until the next blank line. Fenced code is skipped.
fn mdx_esm(source: &[u8]) -> Vec<u8> {
    let mut esm = Vec::new();
    let mut in_code = false;
    let mut in_block = false;
    let mut paragraph_start = true;

    for line in lines(source) {
        if in_block {
            if line.trim_ascii().is_empty() {
                in_block = false;
                paragraph_start = true;
            } else {
                esm.extend_from_slice(line);
                esm.push(b'\n');
            }
            continue;
        }
        if is_code_fence(line) {
            in_code = !in_code;
            paragraph_start = false;
            continue;
        }
        if in_code {
            continue;
        }
        if paragraph_start && is_esm_start(line) {
            in_block = true;
            esm.extend_from_slice(line);
            esm.push(b'\n');
            continue;
        }
        paragraph_start = line.trim_ascii().is_empty();
    }
    esm
}
