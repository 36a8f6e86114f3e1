use crate::{domain::PATH_SEPARATOR, error::ReaderError};

/// How a fetch request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Exact name lookup.
    Single,
    /// Paginated lookup of everything below a path.
    Path,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchConfig {
    pub path: String,
    pub recursive: bool,
    pub decrypt: bool,
    pub include_path: bool,
    pub base64_encode: bool,
}

impl FetchConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ReaderError> {
        if self.path.trim().is_empty() {
            return Err(ReaderError::Config("--path can not be empty".to_string()));
        }
        Ok(())
    }

    /// Path mode when recursion is requested or the path names a branch (`/app/`).
    pub fn mode(&self) -> FetchMode {
        if self.recursive || self.path.ends_with(PATH_SEPARATOR) {
            FetchMode::Path
        } else {
            FetchMode::Single
        }
    }

    /// The queried path with a guaranteed trailing separator, used for prefix stripping.
    pub fn base_path(&self) -> String {
        if self.path.ends_with(PATH_SEPARATOR) {
            self.path.clone()
        } else {
            format!("{}{PATH_SEPARATOR}", self.path)
        }
    }
}
