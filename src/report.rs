//! Plain-text rendering of a torrent list.
//!
//! Rendering is a pure function of the torrents, the reference time and the
//! [`FinishedPolicy`]: the same inputs always produce the same text.

use std::fmt;

use chrono::{DateTime, Utc};
use transmission_rpc_client::types::{Torrent, TorrentStatus};

/// Placeholder for values the daemon did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// Rule used to decide whether a torrent is done downloading
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FinishedPolicy {
    /// Finished once the completion fraction reaches 1.0
    #[default]
    PercentDone,
    /// Trust the daemon's `isFinished` flag
    Flag,
}

impl FinishedPolicy {
    pub fn is_finished(&self, torrent: &Torrent) -> bool {
        match self {
            Self::PercentDone => torrent.percent_done.is_some_and(|done| done >= 1.0),
            Self::Flag => torrent.is_finished.is_some_and(|flag| flag.as_bool()),
        }
    }
}

/// Span of whole seconds, displayed as `{h}h{m}m{s}s`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms(pub i64);

impl Hms {
    /// Floor division, so negative spans still add back up to the total
    pub fn parts(&self) -> (i64, i64, i64) {
        let hours = self.0.div_euclid(3600);
        let rem = self.0.rem_euclid(3600);
        (hours, rem / 60, rem % 60)
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, seconds) = self.parts();
        write!(f, "{hours}h{minutes}m{seconds}s")
    }
}

struct Flag(bool);

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "True" } else { "False" })
    }
}

/// Either an available value or [`NOT_AVAILABLE`]
struct OrNa<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for OrNa<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}

struct Rate(i64);

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} B/s", self.0)
    }
}

struct Percent(f64);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Completion-dependent part of an entry
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Finished {
        /// bytes per second, 0 when the daemon did not report it
        upload_rate: i64,
    },
    Downloading {
        percent_done: Option<f64>,
        /// only kept when strictly positive
        eta: Option<i64>,
        download_rate: Option<i64>,
        stalled: bool,
    },
}

impl Progress {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }

    pub fn is_seeding(&self) -> bool {
        matches!(self, Self::Finished { upload_rate } if *upload_rate > 0)
    }
}

/// Derived fields of a single torrent
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'t> {
    /// 1-based position in the report
    pub index: usize,
    pub name: Option<&'t str>,
    /// seconds since the torrent was added
    pub age: Option<i64>,
    /// seconds since the last upload or download activity
    pub idle: Option<i64>,
    pub progress: Progress,
    pub status: Option<TorrentStatus>,
}

fn seconds_since(now: DateTime<Utc>, date: Option<DateTime<Utc>>) -> Option<i64> {
    date.map(|date| (now - date).num_seconds())
}

impl<'t> Entry<'t> {
    pub fn new(
        index: usize,
        torrent: &'t Torrent,
        now: DateTime<Utc>,
        policy: FinishedPolicy,
    ) -> Self {
        let progress = if policy.is_finished(torrent) {
            Progress::Finished {
                upload_rate: torrent.rate_upload.unwrap_or(0),
            }
        } else {
            Progress::Downloading {
                percent_done: torrent.percent_done,
                eta: torrent.eta.filter(|eta| *eta > 0),
                download_rate: torrent.rate_download,
                stalled: torrent.is_stalled.is_some_and(|flag| flag.as_bool()),
            }
        };

        Self {
            index,
            name: torrent.name.as_deref().filter(|name| !name.is_empty()),
            age: seconds_since(now, torrent.added_date),
            idle: seconds_since(now, torrent.activity_date),
            progress,
            status: torrent.status,
        }
    }
}

fn field(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "   - {label:<28} : {value}")
}

impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}. {}", self.index, OrNa(self.name))?;
        field(f, "Age in seconds", OrNa(self.age))?;
        field(f, "Age (h/m/s)", OrNa(self.age.map(Hms)))?;
        field(f, "Time since last activity (s)", OrNa(self.idle))?;
        field(f, "Time since last activity", OrNa(self.idle.map(Hms)))?;
        field(f, "Finished", Flag(self.progress.is_finished()))?;

        match &self.progress {
            Progress::Finished { upload_rate } => {
                field(f, "Seeding", Flag(self.progress.is_seeding()))?;
                if self.progress.is_seeding() {
                    field(f, "Seeding speed", Rate(*upload_rate))?;
                }
            }
            Progress::Downloading {
                percent_done,
                eta,
                download_rate,
                stalled,
            } => {
                field(f, "Progress", OrNa(percent_done.map(Percent)))?;
                field(f, "ETA until done", OrNa(eta.map(Hms)))?;
                field(f, "Download speed", OrNa(download_rate.map(Rate)))?;
                field(f, "Stalled", Flag(*stalled))?;
            }
        }

        field(f, "Status", OrNa(self.status))
    }
}

/// Report over a whole torrent list, one block per torrent
#[derive(Debug, Clone, PartialEq)]
pub struct Report<'t> {
    entries: Vec<Entry<'t>>,
}

impl<'t> Report<'t> {
    pub fn new(torrents: &'t [Torrent], now: DateTime<Utc>, policy: FinishedPolicy) -> Self {
        Self {
            entries: torrents
                .iter()
                .enumerate()
                .map(|(idx, torrent)| Entry::new(idx + 1, torrent, now, policy))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[Entry<'t>] {
        &self.entries
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, entry) in self.entries.iter().enumerate() {
            // Blank line between blocks
            if idx > 0 {
                f.write_str("\n")?;
            }

            write!(f, "{entry}")?;
        }

        Ok(())
    }
}

pub fn render(torrents: &[Torrent], now: DateTime<Utc>, policy: FinishedPolicy) -> String {
    Report::new(torrents, now, policy).to_string()
}
