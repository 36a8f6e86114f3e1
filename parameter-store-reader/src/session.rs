use aws_config::BehaviorVersion;
use aws_credential_types::{Credentials, provider::ProvideCredentials};
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_types::{SdkConfig, region::Region};
use tracing::debug;

use crate::{configs::SessionConfig, error::ReaderError};

const CREDENTIALS_PROVIDER_NAME: &str = "parameter-store-reader";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Builds the shared AWS config from flags, environment and profile files.
pub async fn load(config: &SessionConfig) -> Result<SdkConfig, ReaderError> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    match (non_empty(&config.access_key), non_empty(&config.secret_key)) {
        (Some(access_key), Some(secret_key)) => {
            debug!("Using static credentials from the command line");
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                CREDENTIALS_PROVIDER_NAME,
            ));
        }
        (None, None) => {}
        _ => {
            return Err(ReaderError::Credential(
                "--access-key and --secret-key must be given together".to_string(),
            ));
        }
    }

    if let Some(path) = &config.config_file {
        if !path.is_file() {
            return Err(ReaderError::Credential(format!(
                "Failed to lookup credentials file '{}'",
                path.display()
            )));
        }
        debug!(path = %path.display(), "Using credentials file");
        let files = EnvConfigFiles::builder()
            .include_default_config_file(true)
            .with_file(EnvConfigFileKind::Credentials, path.clone())
            .build();
        loader = loader.profile_files(files);
    }

    if let Some(profile) = non_empty(&config.profile) {
        loader = loader.profile_name(profile);
    }

    if let Some(region) = config.resolve_region() {
        loader = loader.region(Region::new(region));
    }

    if let Some(endpoint_url) = config.resolve_endpoint_url() {
        debug!(endpoint_url = endpoint_url.as_str(), "Using endpoint override");
        loader = loader.endpoint_url(endpoint_url);
    }

    Ok(loader.load().await)
}

/// Resolves credentials and region once, so a broken session is reported
/// before the first fetch.
pub async fn verify(config: &SdkConfig) -> Result<(), ReaderError> {
    if config.region().is_none() {
        return Err(ReaderError::Credential(
            "No region configured, use --region, AWS_REGION or EC2_REGION".to_string(),
        ));
    }

    let provider = config.credentials_provider().ok_or_else(|| {
        ReaderError::Credential("No credentials provider configured".to_string())
    })?;

    provider.provide_credentials().await.map_err(|err| {
        ReaderError::Credential(format!(
            "Failed to resolve credentials: {}",
            DisplayErrorContext(&err)
        ))
    })?;

    Ok(())
}
