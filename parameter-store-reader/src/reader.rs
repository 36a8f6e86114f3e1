use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
    sync::Arc,
};

use clap::Parser;
use dotenvy::dotenv;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::Args,
    configs::{FetchMode, ReaderConfig},
    domain::FlatMap,
    error::ReaderError,
    format::{OutputFormat, render},
    session,
    store::{ParameterSource, ParameterStore, adapters::ssm_store::SsmParameterStore},
};

const DEFAULT_LOG_FILTER: &str = "warn";

fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter) // reads RUST_LOG
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}

/// Fetches and renders according to `config`; no output is produced on error.
pub async fn run<S>(config: &ReaderConfig, source: Arc<S>) -> Result<Vec<u8>, ReaderError>
where
    S: ParameterSource + ?Sized,
{
    let store = ParameterStore::new(source);

    match config.fetch.mode() {
        FetchMode::Single => {
            let value = store.fetch_single(&config.fetch).await?;
            if config.format.format == OutputFormat::Line {
                return Ok(value.into_bytes());
            }
            let key = config.format.transform.apply_to_path(&config.fetch.path);
            let data = FlatMap::from([(key, value)]);
            render(&data, &config.format.without_transform())
        }
        FetchMode::Path => {
            let data = store
                .fetch_path(
                    &config.fetch,
                    &config.format.transform,
                    config.format.on_collision,
                )
                .await?;
            // keys were already transformed at fetch time
            render(&data, &config.format.without_transform())
        }
    }
}

/// Writes `output` to the file, or to stdout, ending with exactly one newline.
pub fn write_output(output: &[u8], file: Option<&Path>) -> Result<(), ReaderError> {
    let mut bytes = output.to_vec();
    if !bytes.ends_with(b"\n") {
        bytes.push(b'\n');
    }

    match file {
        Some(path) => {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o644);
            }
            let mut file = options.open(path)?;
            file.write_all(&bytes)?;
            info!(path = %path.display(), bytes = bytes.len(), "Output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn execute(args: Args) -> Result<(), ReaderError> {
    let config = ReaderConfig::try_from(args)?;
    debug!("CONFIGS: {:?}", &config);

    let sdk_config = session::load(&config.session).await?;
    session::verify(&sdk_config).await?;

    let source = Arc::new(SsmParameterStore::new(&sdk_config));
    let output = run(&config, source).await?;
    write_output(&output, config.output_file.as_deref())
}

/// Entry point of the binary. Returns the process exit code.
pub async fn start() -> i32 {
    dotenv().ok();

    setup_logging();

    let args = Args::parse();

    match execute(args).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            1
        }
    }
}
