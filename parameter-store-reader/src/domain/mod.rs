use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use tracing::warn;

use crate::error::ReaderError;

pub const PATH_SEPARATOR: char = '/';

/// Flat result of a fetch: parameter key to value, ordered by key.
pub type FlatMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_parts(self) -> (String, String) {
        (self.name, self.value)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One response of a by-path lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterPage {
    pub parameters: Vec<Parameter>,
    pub next_token: Option<String>,
}

impl ParameterPage {
    pub fn new(parameters: Vec<Parameter>, next_token: Option<String>) -> Self {
        Self {
            parameters,
            next_token,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// The continuation token, treating an empty string as absent.
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// What to do when two entries end up under the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Keep the first value seen, drop the rest with a warning.
    #[default]
    KeepFirst,
    /// Fail with [`ReaderError::KeyCollision`].
    Reject,
}

impl CollisionPolicy {
    /// Inserts `key` into `map` unless it is already present.
    pub fn insert(self, map: &mut FlatMap, key: String, value: String) -> Result<(), ReaderError> {
        if map.contains_key(&key) {
            return match self {
                CollisionPolicy::KeepFirst => {
                    warn!(key = key.as_str(), "Duplicate key, keeping the first value");
                    Ok(())
                }
                CollisionPolicy::Reject => Err(ReaderError::KeyCollision { key }),
            };
        }
        map.insert(key, value);
        Ok(())
    }
}

/// Rewrites the final segment of a key: literal prefix first, then uppercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTransform {
    pub prefix: String,
    pub upper_case: bool,
}

impl KeyTransform {
    pub fn new(prefix: impl Into<String>, upper_case: bool) -> Self {
        Self {
            prefix: prefix.into(),
            upper_case,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.prefix.is_empty() && !self.upper_case
    }

    pub fn apply_to_segment(&self, segment: &str) -> String {
        let prefixed = format!("{}{}", self.prefix, segment);
        if self.upper_case {
            prefixed.to_uppercase()
        } else {
            prefixed
        }
    }

    /// Applies the transform to the last `/`-delimited segment only.
    pub fn apply_to_path(&self, path: &str) -> String {
        match path.rsplit_once(PATH_SEPARATOR) {
            Some((head, last)) => format!("{head}{PATH_SEPARATOR}{}", self.apply_to_segment(last)),
            None => self.apply_to_segment(path),
        }
    }
}

/// Last `/`-delimited segment of a key.
pub fn last_segment(path: &str) -> &str {
    path.rsplit(PATH_SEPARATOR).next().unwrap_or(path)
}
