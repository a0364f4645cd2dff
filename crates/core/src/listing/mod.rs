//! Worklist construction.
//!
//! Turns the raw entries returned by a transport listing into the ordered,
//! validated worklist one download cycle operates on. Malformed entries are
//! dropped, listing order is preserved, and each kept item carries the
//! explicit ordered list of download steps its kind requires.

mod types;

pub use types::{DownloadStep, ItemKind, RemoteItem, ANONYMOUS_EXT};

use std::path::Path;

use tracing::debug;

use crate::transport::RemoteEntry;

/// Normalizes raw listing entries into worklist items.
///
/// Entries with an empty name or url are dropped; the rest keep their
/// listing order. Destinations resolve against `work_dir`.
pub fn normalize(entries: Vec<RemoteEntry>, kind: ItemKind, work_dir: &Path) -> Vec<RemoteItem> {
    let total = entries.len();
    let items: Vec<RemoteItem> = entries
        .into_iter()
        .filter(|entry| {
            let valid = !entry.name.is_empty() && !entry.url.is_empty();
            if !valid {
                debug!(name = %entry.name, url = %entry.url, "dropping malformed listing entry");
            }
            valid
        })
        .map(|entry| RemoteItem::from_entry(entry, kind, work_dir))
        .collect();

    if items.len() < total {
        debug!(
            kept = items.len(),
            listed = total,
            "listing contained malformed entries"
        );
    }
    items
}
