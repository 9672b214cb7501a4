use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::core::error::{DiscoveryError, Result};

/// Module names whose import marks a file as an entrypoint.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    modules: HashSet<String>,
}

impl MarkerSet {
    pub fn new<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

pub struct TreeSitterParser {
    parser: Parser,
    language_name: &'static str,
}

impl TreeSitterParser {
    pub fn new(language: Language, language_name: &'static str) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| DiscoveryError::Grammar {
                language: language_name.to_string(),
                message: format!("{e:?}"),
            })?;
        Ok(Self {
            parser,
            language_name,
        })
    }

    /// Parse `source`; tree-sitter recovers from syntax errors, so the tree
    /// may contain ERROR nodes.
    pub fn parse(&mut self, source: &[u8], file_path: &Path) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| DiscoveryError::Grammar {
                language: self.language_name.to_string(),
                message: format!("parser gave up on {}", file_path.display()),
            })
    }

    /// Look for a marker import in the error-recovered tree.
    ///
    /// A marker import found next to unparseable code still counts. Under
    /// [`ErrorTolerance::Strict`] a tree with errors and no match is a parse
    /// error; under `Lenient` it is simply not a match.
    pub fn scan_markers(
        &mut self,
        source: &[u8],
        file_path: &Path,
        markers: &MarkerSet,
        tolerance: ErrorTolerance,
    ) -> Result<bool> {
        let tree = self.parse(source, file_path)?;
        let root = tree.root_node();
        if imports_marker(&root, source, markers) {
            return Ok(true);
        }
        if tolerance == ErrorTolerance::Strict && root.has_error() {
            let position = first_error(&root).unwrap_or(root).start_position();
            return Err(DiscoveryError::Parse {
                path: file_path.to_path_buf(),
                line: position.row + 1,
                column: position.column + 1,
            });
        }
        Ok(false)
    }
}

/// How syntax errors in a file without a marker import are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTolerance {
    /// Script sources: report them as parse errors.
    Strict,
    /// Sources only partly made of script (frontmatter, MDX, unknown files).
    Lenient,
}

/// Buffered read of the raw file bytes; tree-sitter works on bytes, so
/// non-UTF-8 content does not fail the read.
pub fn read_source(file_path: &Path) -> Result<Vec<u8>> {
    let file = File::open(file_path).map_err(|e| DiscoveryError::io(file_path, e))?;
    let file_size = file
        .metadata()
        .map_err(|e| DiscoveryError::io(file_path, e))?
        .len() as usize;

    let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
    let mut content = Vec::with_capacity(file_size);
    reader
        .read_to_end(&mut content)
        .map_err(|e| DiscoveryError::io(file_path, e))?;
    Ok(content)
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

/// Depth-first search for the first ERROR or MISSING node.
pub fn first_error<'tree>(node: &TSNode<'tree>) -> Option<TSNode<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(|child| first_error(&child));
    found
}

/// Module specifier of an `import_statement`, without quotes.
fn import_source<'a>(import_node: &TSNode, source: &'a [u8]) -> Option<&'a str> {
    let string_node = import_node.child_by_field_name("source").or_else(|| {
        let mut cursor = import_node.walk();
        let found = import_node
            .children(&mut cursor)
            .find(|child| child.kind() == "string");
        found
    })?;
    let text = extract_text(&string_node, source);
    Some(unquote(text))
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

/// Recursive-descent visit of the syntax tree; stops at the first import
/// declaration whose module specifier is one of `markers`.
///
/// Only static `import ... from "x"` / `import "x"` declarations count.
/// Dynamic `import("x")`, `require("x")`, re-exports, comments and string
/// literals that merely contain a marker name do not.
pub fn imports_marker(node: &TSNode, source: &[u8], markers: &MarkerSet) -> bool {
    if node.kind() == "import_statement"
        && import_source(node, source).is_some_and(|module| markers.contains(module))
    {
        return true;
    }

    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| imports_marker(&child, source, markers));
    found
}
