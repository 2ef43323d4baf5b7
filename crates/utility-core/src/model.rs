//! State record for one `utility_file_downloader` instance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::fetch::HttpMethod;

/// Desired, observed or persisted state. Attribute names match the schema.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDownloaderModel {
    pub url: String,
    pub filename: String,
    /// Absent and empty both mean GET.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Values are whatever the host sent; only strings are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_download: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl FileDownloaderModel {
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Method to send, upper-cased; GET when absent or empty.
    pub fn resolved_method(&self) -> String {
        match self.method.as_deref() {
            Some(m) if !m.is_empty() => m.to_ascii_uppercase(),
            _ => HttpMethod::Get.as_str().to_string(),
        }
    }

    /// Plain string headers. Non-string values are dropped without error.
    pub fn flat_headers(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .flatten()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect()
    }

    pub fn force_download(&self) -> bool {
        self.force_download.unwrap_or(false)
    }

    /// Record content identity; `id` always mirrors `sha1`.
    pub fn with_checksums(mut self, checksums: &crate::checksum::Checksums) -> Self {
        self.id = Some(checksums.sha1.clone());
        self.sha1 = Some(checksums.sha1.clone());
        self.sha256 = Some(checksums.sha256.clone());
        self
    }
}

impl fmt::Debug for FileDownloaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDownloaderModel")
            .field("url", &self.url)
            .field("filename", &self.filename)
            .field("method", &self.method)
            .field(
                "headers",
                &self.headers.as_ref().map(|h| format!("<{} sensitive>", h.len())),
            )
            .field("force_download", &self.force_download)
            .field("id", &self.id)
            .field("sha1", &self.sha1)
            .field("sha256", &self.sha256)
            .finish()
    }
}
