use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

pub(crate) const TMP_MARKER: &str = ".skctmp.";

/// Outcome of a stale temp file sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub removed: usize,
    pub failed: usize,
}

pub(crate) async fn purge_tmp(root: &Path, stale_after: Duration) -> PurgeReport {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now, stale_after)).await {
        Ok(report) => {
            if report.removed > 0 || report.failed > 0 {
                info!(removed = report.removed, failed = report.failed, "Cleaned up temporary files");
            }
            report
        },
        Err(e) => {
            error!(error = %e, "Temp file cleanup task panicked");
            PurgeReport::default()
        },
    }
}

fn remove_stale(root: &Path, now: SystemTime, stale_after: Duration) -> PurgeReport {
    let mut report = PurgeReport::default();

    for entry in WalkDir::new(root).contents_first(true).into_iter().flatten() {
        let path = entry.path();
        if path == root {
            continue;
        }

        if entry.file_type().is_file() {
            if is_tmp(&entry) && is_stale(&entry, now, stale_after) {
                match std::fs::remove_file(path) {
                    Ok(()) => report.removed += 1,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                        report.failed += 1;
                    },
                }
            }
        } else if entry.file_type().is_dir() {
            // Only succeeds for shard directories left empty.
            let _ = std::fs::remove_dir(path);
        }
    }

    report
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime, stale_after: Duration) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age >= stale_after)
}
