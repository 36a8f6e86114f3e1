use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use futures::{Stream, TryStreamExt, pin_mut, stream};
use tracing::{debug, info};

use crate::{
    configs::FetchConfig,
    domain::{CollisionPolicy, FlatMap, KeyTransform, PATH_SEPARATOR, Parameter, ParameterPage},
    error::ReaderError,
    store::repository::{ParameterSource, PathQuery},
};

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Read client over any [`ParameterSource`]. Requests are issued one at a time.
pub struct ParameterStore<S>
where
    S: ParameterSource + ?Sized,
{
    source: Arc<S>,
}

impl<S> Clone for ParameterStore<S>
where
    S: ParameterSource + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> ParameterStore<S>
where
    S: ParameterSource + ?Sized,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Value of exactly one parameter, base64 encoded when configured.
    pub async fn fetch_single(&self, config: &FetchConfig) -> Result<String, ReaderError> {
        let parameter = self
            .source
            .get_parameter(&config.path, config.decrypt)
            .await?
            .ok_or_else(|| ReaderError::NotFound {
                name: config.path.clone(),
            })?;

        let (_, value) = parameter.into_parts();
        if config.base64_encode {
            Ok(encode(&value))
        } else {
            Ok(value)
        }
    }

    /// Pages of a by-path lookup, lazily requested until the store stops
    /// returning a continuation token.
    pub fn pages<'a>(
        &'a self,
        query: &'a PathQuery,
    ) -> impl Stream<Item = Result<ParameterPage, ReaderError>> + 'a {
        stream::try_unfold(Cursor::Start, move |cursor| async move {
            let token = match cursor {
                Cursor::Start => None,
                Cursor::Next(token) => Some(token),
                Cursor::Done => return Ok(None),
            };

            let page = self.source.get_parameters_by_path(query, token).await?;
            let next = match page.continuation() {
                Some(token) => Cursor::Next(token.to_string()),
                None => Cursor::Done,
            };
            Ok::<_, ReaderError>(Some((page, next)))
        })
    }

    /// Every parameter under `config.path`, keyed relative to it unless
    /// `include_path` is set.
    ///
    /// An empty first page is an error rather than an empty map. Base64
    /// encoding and the key transform run after all pages are collected.
    pub async fn fetch_path(
        &self,
        config: &FetchConfig,
        transform: &KeyTransform,
        on_collision: CollisionPolicy,
    ) -> Result<FlatMap, ReaderError> {
        let query = PathQuery::new(config.path.clone(), config.recursive, config.decrypt);
        let base_path = config.base_path();
        let mut out = FlatMap::new();

        let pages = self.pages(&query);
        pin_mut!(pages);

        let mut page_count = 0usize;
        while let Some(page) = pages.try_next().await? {
            if page_count == 0 && page.is_empty() {
                return Err(ReaderError::EmptyResult {
                    path: config.path.clone(),
                });
            }
            page_count += 1;
            debug!(
                page = page_count,
                parameters = page.parameters.len(),
                "Collected page"
            );

            for parameter in page.parameters {
                let key = output_key(&parameter, &base_path, config.include_path);
                let (_, value) = parameter.into_parts();
                on_collision.insert(&mut out, key, value)?;
            }
        }

        info!(
            path = config.path.as_str(),
            pages = page_count,
            parameters = out.len(),
            "Fetched parameters"
        );

        if config.base64_encode {
            for value in out.values_mut() {
                *value = encode(value);
            }
        }

        if transform.is_identity() {
            return Ok(out);
        }

        let mut transformed = FlatMap::new();
        for (key, value) in out {
            on_collision.insert(&mut transformed, transform.apply_to_path(&key), value)?;
        }
        Ok(transformed)
    }
}

fn output_key(parameter: &Parameter, base_path: &str, include_path: bool) -> String {
    if include_path {
        return parameter.name().to_string();
    }
    match parameter.name().strip_prefix(base_path) {
        Some(relative) => format!("{PATH_SEPARATOR}{relative}"),
        None => parameter.name().to_string(),
    }
}

fn encode(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}
