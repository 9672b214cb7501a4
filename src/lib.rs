//! # ENTRYSCAN
//!
//! Finds the component entrypoints of an island-hydration build.
//!
//! A source tree is crawled with full symlink support (cycles and dangling
//! links are handled), each file is checked against include/exclude
//! patterns, and the survivors are parsed with tree-sitter to see whether
//! they statically import one of the marker modules.
//!
//! ## Supported Sources
//!
//! TypeScript (`.ts`, `.mts`, `.cts`), TSX, JavaScript and JSX
//! (`.js`, `.jsx`, `.mjs`, `.cjs`)

pub mod build;
pub mod config;
pub mod core;
pub mod formatters;
pub mod parsers;
pub mod render;

pub use crate::config::{DiscoveryConfig, ParseFailurePolicy};
pub use crate::core::{discover_entrypoints, DiscoveryError, DiscoveryReport, EntrypointDiscovery};
