//! Server-render bookkeeping for island components.
//!
//! Values the host passes per render (base path, source dir) travel in an
//! explicit [`RenderContext`]; the "loader already emitted" flag lives in a
//! caller-owned [`LoaderRegistry`] keyed by [`ResponseId`].

pub mod component;
pub mod registry;
pub mod scripts;

pub use component::{is_renderable, ComponentKind, ComponentTag};
pub use registry::{LoaderRegistry, ResponseId};
pub use scripts::{inject_scripts, BootstrapScripts};

/// Per-render parameters that the host threads through the call chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Base URL for client bundles, set once the build knows its output dir.
    pub base: Option<String>,
    /// Source directory relative to the project root, used in dev symbol paths.
    pub src_dir: String,
}

impl RenderContext {
    pub fn new(src_dir: impl Into<String>) -> Self {
        Self {
            base: None,
            src_dir: src_dir.into(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// A component's own `q:base` prop wins over the build-wide base.
    pub fn resolve_base<'a>(&'a self, prop_base: Option<&'a str>) -> Option<&'a str> {
        prop_base.or(self.base.as_deref())
    }

    /// Dev-mode URL of the chunk holding `symbol`.
    pub fn symbol_path(&self, symbol: &str) -> String {
        let src_dir = self.src_dir.trim_matches('/');
        format!("/{}/{}.js", src_dir, symbol.to_lowercase())
    }
}
