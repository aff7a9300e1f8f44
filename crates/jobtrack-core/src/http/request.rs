//! Blocking curl transfer. Call through `spawn_blocking` from async code.

use std::str;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub(super) struct Request {
    pub(super) method: Method,
    pub(super) url: String,
    pub(super) headers: Vec<(String, String)>,
    pub(super) body: Option<Vec<u8>>,
    pub(super) timeout: Duration,
}

#[derive(Debug, Clone)]
pub(super) struct RawResponse {
    pub(super) code: u32,
    /// Header lines of the final response (earlier redirect blocks dropped).
    pub(super) headers: Vec<String>,
    pub(super) body: Vec<u8>,
}

impl RawResponse {
    pub(super) fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

pub(super) fn perform(request: &Request) -> Result<RawResponse, curl::Error> {
    let mut headers: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(&request.url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15).min(request.timeout))?;
    easy.timeout(request.timeout)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    match (request.method, &request.body) {
        (Method::Post, Some(payload)) => {
            easy.post(true)?;
            easy.post_fields_copy(payload)?;
            list.append("Content-Type: application/json")?;
        }
        (Method::Post, None) => {
            easy.post(true)?;
            easy.post_fields_copy(b"")?;
        }
        (Method::Get, _) => easy.get(true)?,
    }
    for (k, v) in &request.headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                let line = s.trim_end();
                // A new status line starts a new header block (after a redirect).
                if line.starts_with("HTTP/") {
                    headers.clear();
                }
                if !line.is_empty() {
                    headers.push(line.to_string());
                }
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
    Ok(RawResponse {
        code,
        headers,
        body,
    })
}
