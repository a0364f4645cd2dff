//! Types shared by transport implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the device's remote storage, as returned by a listing.
///
/// Entries are raw: they have not been validated or resolved against local
/// storage yet. The listing module turns them into worklist items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Stable remote identifier, also used to request deletion.
    pub name: String,
    /// Path of the entry on the device, used to request downloads.
    pub url: String,
    /// Size of the entry in bytes, when the device reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Creation date of the entry, when the device reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl RemoteEntry {
    /// Creates an entry with only the mandatory fields set.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            size: None,
            date: None,
        }
    }
}

/// Which rendition of a remote item a download request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadVariant {
    /// The complete item.
    Full,
    /// The redacted companion, stripped of personal data.
    Anonymous,
}
