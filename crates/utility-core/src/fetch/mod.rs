//! Single-request HTTP(S) fetcher.
//!
//! Uses the curl crate (libcurl). One request per call, redirects followed,
//! no retry, no timeout beyond libcurl's defaults. Only HTTP 200 counts as
//! success; the whole body is buffered in memory with no size cap.

mod error;
mod parse;

pub use error::FetchError;

use std::collections::BTreeMap;
use std::fmt;
use std::str::{self, FromStr};
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

/// Request methods the resource supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(HttpMethod::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(HttpMethod::Post)
        } else {
            Err(FetchError::InvalidRequest(format!("unsupported method {:?}", s)))
        }
    }
}

/// A validated request, ready to send.
#[derive(Clone)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: Url,
    headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// Validate `method` and `url` and collect `headers`. No I/O happens here.
    ///
    /// Header names are compared case-insensitively; for duplicates the last
    /// one in iteration order wins.
    pub fn new(
        method: &str,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> Result<Self, FetchError> {
        let method = method.parse::<HttpMethod>()?;
        let url = Url::parse(url)
            .map_err(|e| FetchError::InvalidRequest(format!("invalid URL {:?}: {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidRequest(format!(
                "unsupported protocol scheme {:?}",
                url.scheme()
            )));
        }

        let mut collected: Vec<(String, String)> = Vec::with_capacity(headers.len());
        for (name, value) in headers {
            check_header(name, value)?;
            match collected
                .iter_mut()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
            {
                Some(slot) => *slot = (name.clone(), value.clone()),
                None => collected.push((name.clone(), value.clone())),
            }
        }

        Ok(FetchRequest {
            method,
            url,
            headers: collected,
        })
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// Names must be RFC 9110 tokens; values may not contain CR, LF or NUL.
/// Anything else would let one header smuggle in another.
fn check_header(name: &str, value: &str) -> Result<(), FetchError> {
    let is_tchar = |b: u8| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b);
    if name.is_empty() || !name.bytes().all(is_tchar) {
        return Err(FetchError::InvalidRequest(format!(
            "invalid header field name {:?}",
            name
        )));
    }
    if value.bytes().any(|b| matches!(b, b'\r' | b'\n' | b'\0')) {
        // The value is sensitive; name the field only.
        return Err(FetchError::InvalidRequest(format!(
            "invalid header field value for {:?}",
            name
        )));
    }
    Ok(())
}

// Header values are sensitive and never printed.
impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers.len())
            .finish()
    }
}

/// Anything that can turn a request into a response body.
pub trait Fetch: Send + Sync {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(request)
    }
}

/// libcurl-backed fetcher.
///
/// Keeps idle easy handles for reuse so libcurl's connection cache survives
/// across calls. The pool lock is held only while taking or returning a
/// handle, never during a transfer.
#[derive(Default)]
pub struct CurlFetcher {
    idle: Mutex<Vec<curl::easy::Easy>>,
}

impl CurlFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn checkout(&self) -> curl::easy::Easy {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_else(curl::easy::Easy::new)
    }

    fn checkin(&self, mut easy: curl::easy::Easy) {
        // reset() clears options but keeps live connections and caches.
        easy.reset();
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(easy);
    }

    fn perform(
        easy: &mut curl::easy::Easy,
        request: &FetchRequest,
    ) -> Result<Vec<u8>, FetchError> {
        easy.url(request.url.as_str())?;
        match request.method {
            HttpMethod::Get => easy.get(true)?,
            HttpMethod::Post => {
                easy.post(true)?;
                easy.post_field_size(0)?;
            }
        }
        easy.follow_location(true)?;
        easy.max_redirections(10)?;

        let mut list = curl::easy::List::new();
        for (k, v) in &request.headers {
            // libcurl drops "Name:" lines; "Name;" sends an empty header.
            if v.is_empty() {
                list.append(&format!("{};", k))?;
            } else {
                list.append(&format!("{}: {}", k, v))?;
            }
        }
        // A bodyless POST would otherwise get libcurl's form Content-Type.
        if request.method == HttpMethod::Post && !request.has_header("Content-Type") {
            list.append("Content-Type:")?;
        }
        easy.http_headers(list)?;

        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if code != 200 {
            let status =
                parse::final_status(&header_lines).unwrap_or_else(|| parse::status_text(code));
            return Err(FetchError::Status { code, status });
        }
        Ok(body)
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
        let mut easy = self.checkout();
        let result = Self::perform(&mut easy, request);
        self.checkin(easy);
        match &result {
            Ok(body) => tracing::debug!(
                method = %request.method,
                url = %request.url,
                bytes = body.len(),
                "fetch complete"
            ),
            Err(e) => tracing::debug!(
                method = %request.method,
                url = %request.url,
                error = %e,
                "fetch failed"
            ),
        }
        result
    }
}
