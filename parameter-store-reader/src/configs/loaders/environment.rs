use std::env;

/// Reads a variable, treating an empty value as unset.
pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name).ok().filter(|value| !value.is_empty())
}

/// First variable in `env_names` that is set and non-empty.
pub fn first_env(env_names: &[&str]) -> Option<String> {
    env_names.iter().find_map(|name| optional_env(name))
}

pub fn is_set(env_name: &str) -> bool {
    optional_env(env_name).is_some()
}
