//! Worklist item types.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transport::{DownloadVariant, RemoteEntry};

/// Extension appended to the destination file of an anonymous rendition.
pub const ANONYMOUS_EXT: &str = ".anon";

/// Kind of item a downloader fetches from the device.
///
/// The kind determines the download plan: which renditions exist for one
/// remote item and in which order they are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Crash reports: a full rendition plus a redacted companion.
    CrashReport,
    /// Flight data records: a single full rendition.
    FlightData,
}

impl ItemKind {
    /// Ordered renditions a single item of this kind requires.
    pub fn download_variants(self) -> &'static [DownloadVariant] {
        match self {
            Self::CrashReport => &[DownloadVariant::Full, DownloadVariant::Anonymous],
            Self::FlightData => &[DownloadVariant::Full],
        }
    }
}

/// One download step of an item's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadStep {
    /// Rendition this step fetches.
    pub variant: DownloadVariant,
    /// Local file the rendition is staged to.
    pub destination: PathBuf,
}

/// One unit of work of a download cycle.
///
/// Produced fresh by each listing, never mutated, discarded when superseded
/// by a newer listing. Always carries at least one download step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    /// Stable remote identifier, used to request deletion.
    pub id: String,
    /// Path of the item on the device, used to request downloads.
    pub remote_path: String,
    /// Ordered download steps, derived from the item kind.
    pub steps: Vec<DownloadStep>,
    /// Size in bytes, when the device reported it.
    pub size: Option<u64>,
    /// Creation date, when the device reported it.
    pub date: Option<DateTime<Utc>>,
}

impl RemoteItem {
    /// Builds a worklist item from a validated listing entry.
    pub(crate) fn from_entry(entry: RemoteEntry, kind: ItemKind, work_dir: &Path) -> Self {
        let steps = kind
            .download_variants()
            .iter()
            .map(|&variant| {
                let file_name = match variant {
                    DownloadVariant::Full => entry.name.clone(),
                    DownloadVariant::Anonymous => format!("{}{ANONYMOUS_EXT}", entry.name),
                };
                DownloadStep {
                    variant,
                    destination: work_dir.join(file_name),
                }
            })
            .collect();

        Self {
            id: entry.name,
            remote_path: entry.url,
            steps,
            size: entry.size,
            date: entry.date,
        }
    }
}
