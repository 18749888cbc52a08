use anyhow::Result;
use taskboard::cli::{self, Args};
use taskboard::{ConfigDiscovery, TaskboardConfig, env};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TaskboardConfig::from_toml_file(path)?,
        None => ConfigDiscovery::discover_config()?,
    };

    let filter = EnvFilter::try_from_env(env::LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new(env::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting taskboard");

    let output = cli::execute(args.command)?;
    print!("{}", output);
    Ok(())
}
