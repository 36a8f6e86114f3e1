use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::{
    configs::{FetchConfig, FormatOptions, ReaderConfig, SessionConfig},
    domain::{CollisionPolicy, KeyTransform},
    error::ReaderError,
    format::OutputFormat,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Read values from AWS SSM Parameter Store",
    disable_version_flag = true
)]
pub struct Args {
    /// Parameter name, or the path to look under. A trailing '/' or
    /// --recursive reads every parameter below it.
    #[arg(long)]
    pub path: String,

    /// Base64 encode collected values
    #[arg(long)]
    pub base64: bool,

    /// Output format: line, json, pretty-json, yaml or env
    #[arg(long, default_value = "line")]
    pub format: String,

    /// Uppercase the last segment of every key
    #[arg(long)]
    pub upper_case: bool,

    /// Literal prefix added to the last segment of every key
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Look up all keys in the branch
    #[arg(long)]
    pub recursive: bool,

    /// Request decrypted values
    #[arg(long)]
    pub decrypt: bool,

    /// Access key for the AWS API
    #[arg(long)]
    pub access_key: Option<String>,

    /// Secret key for the AWS API
    #[arg(long)]
    pub secret_key: Option<String>,

    /// Region for the AWS API, falls back to AWS_REGION then EC2_REGION
    #[arg(long)]
    pub region: Option<String>,

    /// Named profile from the credentials file
    #[arg(long)]
    pub profile: Option<String>,

    /// Credentials file to use instead of ~/.aws/credentials
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Endpoint override, e.g. a local emulator
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Keep the full parameter name instead of the name relative to --path
    #[arg(long)]
    pub include_path: bool,

    /// Fail when two parameters end up under the same output key
    #[arg(long)]
    pub strict_keys: bool,

    /// Write output to this file instead of stdout
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Show version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

impl TryFrom<Args> for ReaderConfig {
    type Error = ReaderError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let fetch = FetchConfig {
            path: args.path,
            recursive: args.recursive,
            decrypt: args.decrypt,
            include_path: args.include_path,
            base64_encode: args.base64,
        };
        fetch.validate()?;

        let on_collision = if args.strict_keys {
            CollisionPolicy::Reject
        } else {
            CollisionPolicy::KeepFirst
        };
        let format = FormatOptions::new(
            args.format.parse::<OutputFormat>()?,
            KeyTransform::new(args.prefix, args.upper_case),
            on_collision,
        );

        let session = SessionConfig {
            access_key: args.access_key,
            secret_key: args.secret_key,
            region: args.region,
            profile: args.profile,
            config_file: args.config_file,
            endpoint_url: args.endpoint_url,
        };

        Ok(ReaderConfig {
            fetch,
            format,
            session,
            output_file: args.output_file,
        })
    }
}
