//! Error Responses
//!
//! Builds the short HTML responses sent to clients whose request could not
//! be served.

use crate::error::ProxyError;

/// Builds a complete HTTP/1.0 error response with an HTML body.
///
/// # Arguments
/// * `status` - Numeric status code
/// * `reason` - Reason phrase
/// * `message` - Human readable explanation, including the offending input
pub fn error_response(status: u16, reason: &str, message: &str) -> Vec<u8> {
    let body = format!(
        "<html><title>Proxy Error</title>\
         <body bgcolor=\"ffffff\">\r\n\
         {status}: {reason}\r\n\
         <p>{message}\r\n\
         <hr><em>web_proxy</em>\r\n\
         </body></html>\r\n",
        status = status,
        reason = reason,
        message = escape_html(message),
    );

    let mut response = format!(
        "HTTP/1.0 {} {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body.as_bytes());
    response
}

/// Builds the error response reported for `err`.
pub fn for_error(err: &ProxyError) -> Vec<u8> {
    let (status, reason) = err.status();
    error_response(status, reason, &err.to_string())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
