//! Reconciler for the `utility_file_downloader` resource.
//!
//! Every operation is synchronous: fetch the whole body, write it, then hash
//! it. Nothing is shared between calls except the fetcher.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::checksum::{self, Checksums};
use crate::config::{ProviderConfig, ReadPolicy};
use crate::diagnostic::{Diagnostic, Outcome, RemovalReason};
use crate::fetch::{Fetch, FetchError, FetchRequest};
use crate::model::FileDownloaderModel;
use crate::storage::{self, StorageError};

/// Name the resource is registered under with the host.
pub const TYPE_NAME: &str = "utility_file_downloader";

const DOWNLOAD_FAILED: &str = "Download Failed";
const CHECKSUM_FAILED: &str = "Checksum Failed";
const SAME_FILE: &str = "same file";
const FILE_INACCESSIBLE: &str = "File Inaccessible";

/// Fetch or write failure during a download.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct FileDownloader<F> {
    fetcher: F,
    config: ProviderConfig,
}

impl<F: Fetch> FileDownloader<F> {
    pub fn new(fetcher: F, config: ProviderConfig) -> Self {
        Self { fetcher, config }
    }

    /// Download `plan.url` to `plan.filename` and record its checksums.
    pub fn create(&self, plan: FileDownloaderModel) -> Outcome {
        tracing::debug!(url = %plan.url, filename = %plan.filename, "create");
        self.apply(plan)
    }

    /// Refresh `state` from the real world.
    ///
    /// A missing file or a hash that no longer matches `id` removes the
    /// resource so the caller plans a recreate. The file is never rewritten here.
    pub fn read(&self, state: FileDownloaderModel) -> Outcome {
        let path = Path::new(&state.filename);
        // Only a definite "not found" counts as deleted; other stat errors
        // leave the state alone.
        match fs::metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(filename = %state.filename, "file missing, removing from state");
                return Outcome::Removed(RemovalReason::FileMissing);
            }
            Err(e) => {
                tracing::warn!(filename = %state.filename, error = %e, "cannot stat file");
                return Outcome::Error(Diagnostic::error(
                    FILE_INACCESSIBLE,
                    format!("failed to stat {}: {}", state.filename, e),
                ));
            }
        }

        let recorded = state.id.clone().unwrap_or_default();
        let checksums = match self.config.read_policy {
            ReadPolicy::Refetch => match self.fetch(&state) {
                Ok(body) => checksum::digest(&body),
                Err(e) => {
                    return Outcome::Error(Diagnostic::error(DOWNLOAD_FAILED, e.to_string()))
                }
            },
            ReadPolicy::Local => match self.hash_on_disk(path) {
                Ok(c) => c,
                Err(d) => return Outcome::Error(d),
            },
        };
        if checksums.sha1 != recorded {
            tracing::warn!(
                filename = %state.filename,
                recorded = %recorded,
                observed = %checksums.sha1,
                "content drifted, removing from state"
            );
            return Outcome::Removed(RemovalReason::Drifted);
        }

        // Remote unchanged; the file itself may still have been edited.
        if self.config.read_policy == ReadPolicy::Refetch {
            match self.hash_on_disk(path) {
                Ok(local) if local.sha1 != recorded => {
                    tracing::warn!(filename = %state.filename, "file modified on disk, removing from state");
                    return Outcome::Removed(RemovalReason::Drifted);
                }
                Ok(_) => {}
                Err(d) => return Outcome::Error(d),
            }
        }

        Outcome::Ok(state.with_checksums(&checksums))
    }

    /// Move from `state` to `plan`.
    ///
    /// Same URL and no `force_download` on either side: keep `state` as is,
    /// with a warning, and touch neither the network nor the disk.
    pub fn update(&self, plan: FileDownloaderModel, state: FileDownloaderModel) -> Outcome {
        let forced = plan.force_download() || state.force_download();
        if !forced && plan.url == state.url {
            tracing::warn!(url = %plan.url, "url unchanged, skipping download");
            let detail = plan.url.clone();
            return Outcome::Warning(state, Diagnostic::warning(SAME_FILE, detail));
        }
        tracing::debug!(url = %plan.url, filename = %plan.filename, forced, "update");
        self.apply(plan)
    }

    /// Remove the file. Failures are ignored; forgetting the state is the caller's job.
    pub fn delete(&self, state: &FileDownloaderModel) {
        tracing::debug!(filename = %state.filename, "delete");
        storage::remove(Path::new(&state.filename));
    }

    fn apply(&self, plan: FileDownloaderModel) -> Outcome {
        match self.download(&plan) {
            Ok(checksums) => {
                tracing::info!(filename = %plan.filename, sha1 = %checksums.sha1, "file downloaded");
                Outcome::Ok(plan.with_checksums(&checksums))
            }
            Err(e) => {
                tracing::warn!(url = %plan.url, error = %e, "download failed");
                Outcome::Error(Diagnostic::error(DOWNLOAD_FAILED, e.to_string()))
            }
        }
    }

    fn download(&self, model: &FileDownloaderModel) -> Result<Checksums, DownloadError> {
        let body = self.fetch(model)?;
        storage::write(Path::new(&model.filename), &body, self.config.dir_mode)?;
        Ok(checksum::digest(&body))
    }

    fn fetch(&self, model: &FileDownloaderModel) -> Result<Vec<u8>, FetchError> {
        let request =
            FetchRequest::new(&model.resolved_method(), &model.url, &model.flat_headers())?;
        self.fetcher.fetch(&request)
    }

    fn hash_on_disk(&self, path: &Path) -> Result<Checksums, Diagnostic> {
        checksum::digest_path(path)
            .map_err(|e| Diagnostic::error(CHECKSUM_FAILED, format!("{:#}", e)))
    }
}
