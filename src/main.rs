use std::str::FromStr;

use clap::Parser;
use color_eyre::eyre;
use tracing_subscriber::{prelude::*, util::SubscriberInitExt, EnvFilter};

use transmission_report::Args;

fn main() -> eyre::Result<()> {
    let args = Args::parse();

    // Setup eyre
    color_eyre::install()?;

    // Setup tracing
    let _subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_str(&args.log)?)
        .finish()
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;

    // Start runtime
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(transmission_report::run(args))
}
