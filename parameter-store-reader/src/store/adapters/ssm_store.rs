use aws_sdk_ssm::{Client, error::DisplayErrorContext};
use aws_types::SdkConfig;
use tracing::debug;

use crate::{
    domain::{Parameter, ParameterPage},
    error::ReaderError,
    store::repository::{ParameterSource, PathQuery},
};

#[derive(Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self::with_client(Client::new(config))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for SsmParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmParameterStore").finish()
    }
}

fn to_parameter(parameter: &aws_sdk_ssm::types::Parameter) -> Option<Parameter> {
    match (parameter.name(), parameter.value()) {
        (Some(name), Some(value)) => Some(Parameter::new(name, value)),
        _ => None,
    }
}

#[async_trait::async_trait]
impl ParameterSource for SsmParameterStore {
    async fn get_parameter(
        &self,
        name: &str,
        decrypt: bool,
    ) -> Result<Option<Parameter>, ReaderError> {
        debug!(name, decrypt, "GetParameter");

        let result = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(decrypt)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.parameter().and_then(to_parameter)),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found()) =>
            {
                Ok(None)
            }
            Err(err) => Err(ReaderError::Remote(format!(
                "Failed to get parameter '{}': {}",
                name,
                DisplayErrorContext(&err)
            ))),
        }
    }

    async fn get_parameters_by_path(
        &self,
        query: &PathQuery,
        next_token: Option<String>,
    ) -> Result<ParameterPage, ReaderError> {
        debug!(
            path = query.path.as_str(),
            recursive = query.recursive,
            has_token = next_token.is_some(),
            "GetParametersByPath"
        );

        let output = self
            .client
            .get_parameters_by_path()
            .path(&query.path)
            .recursive(query.recursive)
            .with_decryption(query.decrypt)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| {
                ReaderError::Remote(format!(
                    "Failed to get parameters under '{}': {}",
                    query.path,
                    DisplayErrorContext(&err)
                ))
            })?;

        let parameters = output.parameters().iter().filter_map(to_parameter).collect();

        Ok(ParameterPage::new(
            parameters,
            output.next_token().map(str::to_string),
        ))
    }
}
