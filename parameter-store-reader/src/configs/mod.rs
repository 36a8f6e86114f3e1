pub mod fetch;
pub mod loaders;
pub mod output;
pub mod session;

use std::path::PathBuf;

pub use fetch::{FetchConfig, FetchMode};
pub use output::FormatOptions;
pub use session::SessionConfig;

/// A fully validated invocation.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub fetch: FetchConfig,
    pub format: FormatOptions,
    pub session: SessionConfig,
    /// Write to this file instead of stdout.
    pub output_file: Option<PathBuf>,
}
