use anyhow::{Context, Result};
use ctpn_feed::config::Config;
use std::{path::PathBuf, sync::Arc};
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Stream CTPN training samples
struct Args {
    #[structopt(long, default_value = "feed.json5")]
    /// configuration file
    pub config_file: PathBuf,
    #[structopt(long)]
    /// stop after this number of samples
    pub max_samples: Option<usize>,
    #[structopt(long)]
    /// run a single generator on the main thread instead of the worker pool
    pub no_queue: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let Args {
        config_file,
        max_samples,
        no_queue,
    } = Args::from_args();
    let config = Arc::new(
        Config::open(&config_file)
            .with_context(|| format!("failed to load config file '{}'", config_file.display()))?,
    );

    ctpn_feed::start(config, max_samples, !no_queue)?;

    Ok(())
}
