mod cli;
mod migrate_cmd;
mod seed;

use anyhow::Context;
use jobly::JoblyConfig;
use tracing_subscriber::EnvFilter;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Migrate(args) => migrate_cmd::run(args).await,
        cli::Command::Seed(args) => seed::run(args).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Load configuration from `--config`, or from the environment, then apply
/// `--database`.
fn resolve_config(conn: &cli::ConnectionArgs) -> anyhow::Result<JoblyConfig> {
    let mut config = match &conn.config {
        Some(path) => JoblyConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => JoblyConfig::from_env().context("failed to read configuration")?,
    };
    if let Some(url) = &conn.database {
        config.database_url = url.clone();
    }
    Ok(config)
}
