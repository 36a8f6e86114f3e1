use std::collections::BTreeMap;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    domain::{PATH_SEPARATOR, Parameter, ParameterPage},
    error::ReaderError,
    store::repository::{ParameterSource, PathQuery},
};

const DEFAULT_PAGE_SIZE: usize = 10;

/// In-memory parameter store that pages results like the remote service does.
#[derive(Clone)]
pub struct LocalParameterStore {
    parameters: Arc<RwLock<BTreeMap<String, String>>>,
    page_size: usize,
    requests: Arc<AtomicUsize>,
}

impl LocalParameterStore {
    pub fn new() -> Self {
        Self {
            parameters: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: DEFAULT_PAGE_SIZE,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_parameters(parameters: Vec<Parameter>) -> Self {
        let store = Self::new();
        for parameter in parameters {
            store.put(parameter);
        }
        store
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn put(&self, parameter: Parameter) {
        let (name, value) = parameter.into_parts();
        self.parameters.write().unwrap().insert(name, value);
    }

    /// Number of calls served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn matches(query: &PathQuery, name: &str) -> bool {
        let base = if query.path.ends_with(PATH_SEPARATOR) {
            query.path.clone()
        } else {
            format!("{}{PATH_SEPARATOR}", query.path)
        };
        match name.strip_prefix(&base) {
            Some(rest) if !rest.is_empty() => query.recursive || !rest.contains(PATH_SEPARATOR),
            _ => false,
        }
    }
}

impl Default for LocalParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ParameterSource for LocalParameterStore {
    async fn get_parameter(
        &self,
        name: &str,
        _decrypt: bool,
    ) -> Result<Option<Parameter>, ReaderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let parameters = self.parameters.read().unwrap();
        Ok(parameters
            .get(name)
            .map(|value| Parameter::new(name, value.clone())))
    }

    async fn get_parameters_by_path(
        &self,
        query: &PathQuery,
        next_token: Option<String>,
    ) -> Result<ParameterPage, ReaderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let offset = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                ReaderError::Remote(format!("Invalid continuation token '{token}'"))
            })?,
            None => 0,
        };

        let parameters = self.parameters.read().unwrap();
        let matching: Vec<Parameter> = parameters
            .iter()
            .filter(|(name, _)| Self::matches(query, name))
            .map(|(name, value)| Parameter::new(name.clone(), value.clone()))
            .collect();

        let end = (offset + self.page_size).min(matching.len());
        let page = matching.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(ParameterPage::new(page, next_token))
    }
}
