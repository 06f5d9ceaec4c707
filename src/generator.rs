use chrono::{DateTime, Utc};
use tracing::{debug, info};
use transmission_rpc_client::{
    client::Client,
    types::{Torrent, TorrentGet},
};

use crate::{
    config::ReportConfig,
    error::{Error, Result},
    report::Report,
};

/// Anything that can hand over the full torrent list in one go
#[allow(async_fn_in_trait)]
pub trait TorrentSource {
    async fn torrents(&mut self) -> Result<Vec<Torrent>>;
}

impl TorrentSource for Client {
    async fn torrents(&mut self) -> Result<Vec<Torrent>> {
        Ok(self.torrent_get(TorrentGet::default()).await?.torrents)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub torrents: usize,
    pub bytes: usize,
}

/// Fetch every torrent, render the report and overwrite the output file.
///
/// The report is built in memory first, so a failed fetch never touches the
/// destination.
pub async fn generate<S: TorrentSource>(
    source: &mut S,
    config: &ReportConfig,
    now: DateTime<Utc>,
) -> Result<Summary> {
    let torrents = source.torrents().await?;
    info!(count = torrents.len(), "fetched torrents");

    let report = Report::new(&torrents, now, config.policy);
    for entry in report.entries() {
        debug!(
            index = entry.index,
            name = entry.name,
            finished = entry.progress.is_finished(),
            policy = %config.policy,
            "rendered torrent"
        );
    }

    let text = report.to_string();
    std::fs::write(&config.output, &text).map_err(|source| Error::Write {
        path: config.output.clone(),
        source,
    })?;

    Ok(Summary {
        torrents: torrents.len(),
        bytes: text.len(),
    })
}
