pub mod config;
pub mod logging;

pub mod checksum;
pub mod diagnostic;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod storage;

pub use diagnostic::{Diagnostic, Outcome, RemovalReason, Severity};
pub use model::FileDownloaderModel;
pub use provider::{Provider, ResourceRequest, ResourceResponse};
