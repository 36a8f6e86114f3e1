use crate::{
    domain::{Parameter, ParameterPage},
    error::ReaderError,
};

/// One by-path request; the continuation token travels separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    pub path: String,
    pub recursive: bool,
    pub decrypt: bool,
}

impl PathQuery {
    pub fn new(path: impl Into<String>, recursive: bool, decrypt: bool) -> Self {
        Self {
            path: path.into(),
            recursive,
            decrypt,
        }
    }
}

/// The two read operations of the remote parameter store.
#[async_trait::async_trait]
pub trait ParameterSource: Send + Sync {
    /// Exact name lookup. `Ok(None)` when the store has no such parameter.
    async fn get_parameter(
        &self,
        name: &str,
        decrypt: bool,
    ) -> Result<Option<Parameter>, ReaderError>;

    /// One page of parameters under `query.path`.
    async fn get_parameters_by_path(
        &self,
        query: &PathQuery,
        next_token: Option<String>,
    ) -> Result<ParameterPage, ReaderError>;
}
