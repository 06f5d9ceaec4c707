use std::{borrow::Cow, collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntBool {
    Int(i32),
    Bool(bool),
}

impl IntBool {
    pub fn as_bool(&self) -> bool {
        (*self).into()
    }
}

impl Default for IntBool {
    fn default() -> Self {
        Self::Bool(false)
    }
}

impl From<bool> for IntBool {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<IntBool> for bool {
    fn from(value: IntBool) -> Self {
        match value {
            IntBool::Int(i) => i != 0,
            IntBool::Bool(b) => b,
        }
    }
}

/// Activity state of a torrent, as reported by the `status` field
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::FromRepr,
)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum TorrentStatus {
    #[strum(serialize = "stopped")]
    Stopped = 0,
    #[strum(serialize = "check pending")]
    CheckPending = 1,
    #[strum(serialize = "checking")]
    Checking = 2,
    #[strum(serialize = "download pending")]
    DownloadPending = 3,
    #[strum(serialize = "downloading")]
    Downloading = 4,
    #[strum(serialize = "seed pending")]
    SeedPending = 5,
    #[strum(serialize = "seeding")]
    Seeding = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatus(pub i32);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown torrent status code {}", self.0)
    }
}

impl TryFrom<i32> for TorrentStatus {
    type Error = UnknownStatus;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(UnknownStatus(value))
    }
}

impl From<TorrentStatus> for i32 {
    fn from(value: TorrentStatus) -> Self {
        value as i32
    }
}

/// Values that fail to parse become `None` instead of failing the torrent
mod lenient {
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).ok())
    }
}

/// Transmission sends dates as unix seconds, with 0 meaning "never"
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<i64> = super::lenient::deserialize(deserializer)?;

        Ok(secs
            .filter(|secs| *secs != 0)
            .and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.map(|date| date.timestamp()).unwrap_or(0))
    }
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Torrent {
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    #[serde(default, with = "epoch_seconds")]
    pub added_date: Option<DateTime<Utc>>,
    #[serde(default, with = "epoch_seconds")]
    pub activity_date: Option<DateTime<Utc>>,

    /// completion fraction, from 0.0 to 1.0
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub percent_done: Option<f64>,
    /// bytes per second
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate_download: Option<i64>,
    /// bytes per second
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate_upload: Option<i64>,
    /// seconds until done, -1 when not available and -2 when unknown
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub eta: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_finished: Option<IntBool>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_stalled: Option<IntBool>,
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<TorrentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseKind {
    Torrents(Torrents),
    Other {
        #[serde(flatten)]
        extra: serde_json::Value,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseStatus {
    Success,
    Failure(String),
}

impl From<String> for ResponseStatus {
    fn from(value: String) -> Self {
        if value == "success" {
            Self::Success
        } else {
            Self::Failure(value)
        }
    }
}

impl From<ResponseStatus> for String {
    fn from(value: ResponseStatus) -> Self {
        match value {
            ResponseStatus::Success => "success".to_owned(),
            ResponseStatus::Failure(reason) => reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<ResponseKind>,
    pub result: ResponseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Torrents {
    pub torrents: Vec<Torrent>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TorrentGet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Cow<'static, str>>,
}

impl Default for TorrentGet {
    /// Requests every field modelled by [`Torrent`]
    fn default() -> Self {
        Self {
            fields: vec![
                Cow::Borrowed("name"),
                Cow::Borrowed("addedDate"),
                Cow::Borrowed("activityDate"),
                Cow::Borrowed("percentDone"),
                Cow::Borrowed("rateDownload"),
                Cow::Borrowed("rateUpload"),
                Cow::Borrowed("eta"),
                Cow::Borrowed("isFinished"),
                Cow::Borrowed("isStalled"),
                Cow::Borrowed("status"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "method")]
pub enum MethodCall {
    TorrentGet { arguments: TorrentGet },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(flatten)]
    pub call: MethodCall,
    pub tag: Option<i32>,
}
