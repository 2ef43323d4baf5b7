//! Status line extraction from collected response header lines.

/// Status text (`"404 Not Found"`) of the last response in `lines`.
///
/// Redirects and interim responses each contribute a status line; the final
/// response is the last one. HTTP/2 and HTTP/3 send no reason phrase, so a
/// bare code gets its registered reason. Returns `None` when no status line
/// was seen.
pub(crate) fn final_status(lines: &[String]) -> Option<String> {
    let status = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.starts_with("HTTP/"))
        .last()?
        .split_once(' ')?
        .1
        .trim();
    if status.is_empty() {
        return None;
    }
    match status.parse::<u32>() {
        Ok(code) => Some(status_text(code)),
        Err(_) => Some(status.to_string()),
    }
}

/// `"<code> <reason>"` for a registered code, or just the code.
pub(crate) fn status_text(code: u32) -> String {
    match reason_phrase(code) {
        Some(reason) => format!("{} {}", code, reason),
        None => code.to_string(),
    }
}

fn reason_phrase(code: u32) -> Option<&'static str> {
    let reason = match code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        511 => "Network Authentication Required",
        _ => return None,
    };
    Some(reason)
}
