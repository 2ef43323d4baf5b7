//! Provider entry point: owns the shared fetcher and configuration and
//! dispatches typed lifecycle requests to the reconciler.

use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::diagnostic::{Diagnostic, Outcome, RemovalReason};
use crate::fetch::{CurlFetcher, Fetch};
use crate::model::FileDownloaderModel;
use crate::resource::{FileDownloader, TYPE_NAME};
use crate::schema::{self, ResourceSchema};

/// One lifecycle call from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum ResourceRequest {
    Create {
        plan: FileDownloaderModel,
    },
    Read {
        state: FileDownloaderModel,
    },
    Update {
        plan: FileDownloaderModel,
        state: FileDownloaderModel,
    },
    Delete {
        state: FileDownloaderModel,
    },
}

impl ResourceRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            ResourceRequest::Create { .. } => "create",
            ResourceRequest::Read { .. } => "read",
            ResourceRequest::Update { .. } => "update",
            ResourceRequest::Delete { .. } => "delete",
        }
    }
}

/// What goes back to the host.
///
/// `state` is `None` on error, on removal and after delete. `removed` asks the
/// host to drop the resource from its state; `removal_reason` says why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub state: Option<FileDownloaderModel>,
    #[serde(default)]
    pub removed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removal_reason: Option<RemovalReason>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ResourceResponse {
    pub fn has_error(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    fn rejected(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            ..Self::default()
        }
    }
}

impl From<Outcome> for ResourceResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Ok(state) => Self {
                state: Some(state),
                ..Self::default()
            },
            Outcome::Warning(state, warning) => Self {
                state: Some(state),
                diagnostics: vec![warning],
                ..Self::default()
            },
            Outcome::Removed(reason) => Self {
                removed: true,
                removal_reason: Some(reason),
                ..Self::default()
            },
            Outcome::Error(error) => Self::rejected(vec![error]),
        }
    }
}

pub struct Provider<F = CurlFetcher> {
    version: String,
    resource: FileDownloader<F>,
}

impl Provider<CurlFetcher> {
    /// Build the provider with the process-wide libcurl fetcher.
    pub fn new(version: impl Into<String>, config: ProviderConfig) -> Self {
        Self::with_fetcher(version, CurlFetcher::new(), config)
    }
}

impl<F: Fetch> Provider<F> {
    pub fn with_fetcher(version: impl Into<String>, fetcher: F, config: ProviderConfig) -> Self {
        Self {
            version: version.into(),
            resource: FileDownloader::new(fetcher, config),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    pub fn schema(&self) -> ResourceSchema {
        schema::resource_schema()
    }

    /// Run one lifecycle request. Plans get schema defaults and validation first.
    pub fn handle(&self, request: ResourceRequest) -> ResourceResponse {
        tracing::debug!(operation = request.operation(), "handling request");
        match request {
            ResourceRequest::Create { mut plan } => {
                schema::apply_defaults(&mut plan);
                let diags = schema::validate(&plan);
                if !diags.is_empty() {
                    return ResourceResponse::rejected(diags);
                }
                self.resource.create(plan).into()
            }
            ResourceRequest::Read { state } => self.resource.read(state).into(),
            ResourceRequest::Update { mut plan, state } => {
                schema::apply_defaults(&mut plan);
                let diags = schema::validate(&plan);
                if !diags.is_empty() {
                    return ResourceResponse::rejected(diags);
                }
                self.resource.update(plan, state).into()
            }
            ResourceRequest::Delete { state } => {
                self.resource.delete(&state);
                ResourceResponse::default()
            }
        }
    }
}
