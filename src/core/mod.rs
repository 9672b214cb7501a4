pub mod analyzer;
pub mod error;
pub mod filter;
pub mod resolver;
pub mod scanner;

pub use analyzer::{discover_entrypoints, DiscoveryReport, EntrypointDiscovery, SkippedFile};
pub use error::{DiscoveryError, Result};
pub use filter::{Pattern, PatternConfig, SourceFilter};
pub use resolver::{PathResolver, SymlinkResolution};
pub use scanner::{DirectoryCrawler, EntryKind, FileEntry, VisitedSet};
