use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre;
use secrecy::SecretString;
use tracing::{info, info_span, Instrument};

pub mod config;
pub mod error;
pub mod generator;
pub mod report;

use config::{ConnectionConfig, ReportConfig};
use report::FinishedPolicy;

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Host running the Transmission daemon
    #[clap(long, default_value = "transmission-vpn", env = "TRANSMISSION_REPORT_HOST")]
    pub host: String,

    /// Transmission RPC port
    #[clap(long, default_value = "9091", env = "TRANSMISSION_REPORT_PORT")]
    pub port: u16,

    /// RPC username
    #[clap(long, env = "TRANSMISSION_REPORT_USERNAME")]
    pub username: Option<String>,

    /// RPC password
    #[clap(long, env = "TRANSMISSION_REPORT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// File the report is written to, replacing previous contents
    #[clap(
        long,
        default_value = config::DEFAULT_OUTPUT,
        env = "TRANSMISSION_REPORT_OUTPUT"
    )]
    pub output: PathBuf,

    /// How to decide that a torrent is finished
    #[clap(
        long,
        value_enum,
        default_value_t = FinishedPolicy::PercentDone,
        env = "TRANSMISSION_REPORT_FINISHED_POLICY"
    )]
    pub finished_policy: FinishedPolicy,

    /// Log level
    #[clap(long, default_value = "info", env = "TRANSMISSION_REPORT_LOG")]
    pub log: String,
}

impl Args {
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone().map(SecretString::from),
        }
    }

    pub fn report(&self) -> ReportConfig {
        ReportConfig {
            output: self.output.clone(),
            policy: self.finished_policy,
        }
    }
}

pub async fn run(args: Args) -> eyre::Result<()> {
    let connection = args.connection();
    let report = args.report();

    let span = info_span!(
        "report",
        host = %connection.host,
        output = %report.output.display()
    );

    async move {
        let mut client = connection.client()?;
        let summary = generator::generate(&mut client, &report, Utc::now()).await?;

        info!(
            torrents = summary.torrents,
            bytes = summary.bytes,
            "report written"
        );

        Ok::<_, eyre::Report>(())
    }
    .instrument(span)
    .await
}
