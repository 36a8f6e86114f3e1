use std::{fmt, path::PathBuf};

use super::loaders::environment::{first_env, is_set, optional_env};

pub const AWS_REGION_ENV: &str = "AWS_REGION";
pub const EC2_REGION_ENV: &str = "EC2_REGION";
const ENDPOINT_ENVS: [&str; 2] = ["AWS_ENDPOINT_URL_SSM", "AWS_ENDPOINT"];

/// Inputs for the AWS session. Anything left unset falls back to the SDK's default chain.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub config_file: Option<PathBuf>,
    pub endpoint_url: Option<String>,
}

impl SessionConfig {
    /// `--region`, then `AWS_REGION` (left to the SDK), then `EC2_REGION`.
    pub fn resolve_region(&self) -> Option<String> {
        if let Some(region) = self.region.as_ref().filter(|r| !r.is_empty()) {
            return Some(region.clone());
        }
        if is_set(AWS_REGION_ENV) {
            return None;
        }
        optional_env(EC2_REGION_ENV)
    }

    pub fn resolve_endpoint_url(&self) -> Option<String> {
        self.endpoint_url
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(|| first_env(&ENDPOINT_ENVS))
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("profile", &self.profile)
            .field("config_file", &self.config_file)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}
