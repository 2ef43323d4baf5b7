//! Attribute schema for `utility_file_downloader`, plus the defaults and
//! validation applied before a request reaches the reconciler.

use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::fetch::HttpMethod;
use crate::model::FileDownloaderModel;
use crate::resource::TYPE_NAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
    Map,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<&'static str>,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            default: None,
            one_of: Vec::new(),
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

pub fn resource_schema() -> ResourceSchema {
    let mut method = Attribute::new(
        "method",
        AttributeType::String,
        "HTTP method to use for the request (default: GET). Only 'GET' and 'POST' are allowed.",
    )
    .optional()
    .computed();
    method.default = Some(HttpMethod::Get.as_str());
    method.one_of = vec![HttpMethod::Get.as_str(), HttpMethod::Post.as_str()];

    ResourceSchema {
        type_name: TYPE_NAME,
        description:
            "Downloads a remote file via HTTP(S) using GET or POST, optionally with custom headers.",
        attributes: vec![
            Attribute::new(
                "url",
                AttributeType::String,
                "The full HTTP or HTTPS URL to download the file from.",
            )
            .required(),
            Attribute::new(
                "filename",
                AttributeType::String,
                "Local filename where the downloaded file will be saved.",
            )
            .required(),
            method,
            Attribute::new(
                "headers",
                AttributeType::Map,
                "Custom HTTP headers to include in the request, keyed by header name.",
            )
            .optional()
            .sensitive(),
            Attribute::new(
                "force_download",
                AttributeType::Bool,
                "Download even if the URL has not changed.",
            )
            .optional(),
            Attribute::new(
                "id",
                AttributeType::String,
                "Hexadecimal SHA-1 checksum of the downloaded file content.",
            )
            .computed(),
            Attribute::new("sha1", AttributeType::String, "SHA-1 checksum of the file content.")
                .computed(),
            Attribute::new("sha256", AttributeType::String, "SHA-256 checksum of the file content.")
                .computed(),
        ],
    }
}

/// Fill schema defaults: `method` becomes `GET` when absent or empty.
pub fn apply_defaults(model: &mut FileDownloaderModel) {
    if model.method.as_deref().map_or(true, str::is_empty) {
        model.method = Some(HttpMethod::Get.as_str().to_string());
    }
}

/// Check required attributes and the method one-of constraint.
pub fn validate(model: &FileDownloaderModel) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    if model.url.is_empty() {
        diags.push(Diagnostic::error(
            "Missing Required Attribute",
            "attribute \"url\" is required",
        ));
    }
    if model.filename.is_empty() {
        diags.push(Diagnostic::error(
            "Missing Required Attribute",
            "attribute \"filename\" is required",
        ));
    }
    if let Some(m) = model.method.as_deref().filter(|m| !m.is_empty()) {
        // The one-of check is exact; the reconciler tolerates other casings.
        if m != HttpMethod::Get.as_str() && m != HttpMethod::Post.as_str() {
            diags.push(Diagnostic::error(
                "Invalid Attribute Value",
                format!(
                    "attribute \"method\" value must be one of: [\"GET\" \"POST\"], got: {:?}",
                    m
                ),
            ));
        }
    }
    diags
}
