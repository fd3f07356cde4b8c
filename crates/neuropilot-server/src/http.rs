//! Minimal HTTP/1.1 request parsing and response encoding.
//!
//! One request per connection; every response is JSON and closes the
//! connection.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Upper bound on the request line plus headers.
pub const MAX_HEAD_BYTES: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("request body of {length} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { length: usize, limit: usize },

    #[error("transfer encoding '{0}' is not supported")]
    UnsupportedTransferEncoding(String),

    #[error("no complete request received within {secs}s")]
    TimedOut { secs: u64 },

    #[error("connection closed before a full request was read")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HttpError {
    /// Status code to answer with, if the connection is still usable.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Malformed(_) => Some(400),
            Self::BodyTooLarge { .. } => Some(413),
            Self::UnsupportedTransferEncoding(_) => Some(501),
            Self::TimedOut { .. } => Some(408),
            Self::ConnectionClosed | Self::Io(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Read one request from `reader`.
pub async fn read_request<R>(reader: &mut R, max_body_bytes: usize) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head_bytes = 0usize;
    let request_line = read_line(reader, &mut head_bytes).await?;
    if request_line.is_empty() {
        return Err(HttpError::ConnectionClosed);
    }

    // Parse: POST /ml/predict/ HTTP/1.1
    let mut parts = request_line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version)) if version.starts_with("HTTP/") => {
            (method.to_ascii_uppercase(), target)
        }
        _ => return Err(HttpError::Malformed(format!("bad request line '{request_line}'"))),
    };
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut headers = Vec::new();
    loop {
        let line = read_line(reader, &mut head_bytes).await?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::Malformed(format!("bad header '{line}'")))?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let mut request = Request {
        method,
        path,
        headers,
        body: Vec::new(),
    };

    let content_length = match request.header("content-length") {
        Some(raw) => Some(
            raw.parse::<usize>()
                .map_err(|_| HttpError::Malformed(format!("bad content-length '{raw}'")))?,
        ),
        None => None,
    };
    let transfer_encoding = request
        .header("transfer-encoding")
        .map(|v| v.trim().to_ascii_lowercase());

    request.body = match transfer_encoding.as_deref() {
        None => read_sized(reader, content_length.unwrap_or(0), max_body_bytes).await?,
        Some(_) if content_length.is_some() => {
            return Err(HttpError::Malformed(
                "both transfer-encoding and content-length are set".to_string(),
            ))
        }
        Some("identity") => read_sized(reader, 0, max_body_bytes).await?,
        Some("chunked") => read_chunked(reader, max_body_bytes).await?,
        Some(other) => return Err(HttpError::UnsupportedTransferEncoding(other.to_string())),
    };
    Ok(request)
}

async fn read_sized<R>(
    reader: &mut R,
    length: usize,
    max_body_bytes: usize,
) -> Result<Vec<u8>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    if length > max_body_bytes {
        return Err(HttpError::BodyTooLarge {
            length,
            limit: max_body_bytes,
        });
    }
    let mut body = vec![0u8; length];
    fill(reader, &mut body).await?;
    Ok(body)
}

/// Decode a chunked body. The decoded size is held to `max_body_bytes`.
async fn read_chunked<R>(reader: &mut R, max_body_bytes: usize) -> Result<Vec<u8>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();
    loop {
        let mut line_bytes = 0;
        let line = read_line(reader, &mut line_bytes).await?;
        if line_bytes == 0 {
            return Err(HttpError::ConnectionClosed);
        }
        // Chunk extensions after ';' are ignored.
        let size_field = line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_field, 16)
            .map_err(|_| HttpError::Malformed(format!("bad chunk size '{line}'")))?;
        if size == 0 {
            break;
        }

        let length = body.len().saturating_add(size);
        if length > max_body_bytes {
            return Err(HttpError::BodyTooLarge {
                length,
                limit: max_body_bytes,
            });
        }
        let start = body.len();
        body.resize(length, 0);
        fill(reader, &mut body[start..]).await?;

        let mut line_bytes = 0;
        if !read_line(reader, &mut line_bytes).await?.is_empty() {
            return Err(HttpError::Malformed("chunk data not followed by CRLF".to_string()));
        }
    }

    // Trailer fields are read and discarded, under the same bound as a head.
    let mut trailer_bytes = 0;
    loop {
        if read_line(reader, &mut trailer_bytes).await?.is_empty() {
            break;
        }
    }
    Ok(body)
}

async fn fill<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), HttpError>
where
    R: AsyncBufRead + Unpin,
{
    reader.read_exact(buf).await.map(|_| ()).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            HttpError::ConnectionClosed
        } else {
            HttpError::Io(e)
        }
    })
}

/// Read a CRLF- or LF-terminated line without the terminator.
///
/// An empty string at EOF on the request line signals a closed connection.
async fn read_line<R>(reader: &mut R, head_bytes: &mut usize) -> Result<String, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::new();
    let read = (&mut *reader)
        .take((MAX_HEAD_BYTES - *head_bytes + 1) as u64)
        .read_until(b'\n', &mut raw)
        .await?;
    *head_bytes += read;
    if *head_bytes > MAX_HEAD_BYTES {
        return Err(HttpError::Malformed("request head too large".to_string()));
    }
    if read > 0 && raw.last() != Some(&b'\n') {
        return Err(HttpError::ConnectionClosed);
    }
    let line = String::from_utf8(raw)
        .map_err(|_| HttpError::Malformed("request head is not UTF-8".to_string()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// A JSON response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
    /// Sent as `Allow` on 405 responses.
    pub allow: Option<&'static str>,
}

impl Response {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            allow: None,
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(
            status,
            serde_json::json!({ "success": false, "error": message.into() }),
        )
    }

    pub fn with_allow(mut self, allow: &'static str) -> Self {
        self.allow = Some(allow);
        self
    }

    /// Serialize status line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body = self.body.to_string();
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            reason_phrase(self.status),
            body.len()
        );
        if let Some(allow) = self.allow {
            head.push_str(&format!("Allow: {allow}\r\n"));
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(body.as_bytes());
        bytes
    }
}

pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn parse(raw: &str, limit: usize) -> Result<Request, HttpError> {
        let mut reader = tokio::io::BufReader::new(raw.as_bytes());
        read_request(&mut reader, limit).await
    }

    #[tokio::test]
    async fn parses_post_with_body() {
        let req = parse(
            "POST /ml/predict/?debug=1 HTTP/1.1\r\nHost: x\r\nContent-Length: 2\r\n\r\n{}",
            1024,
        )
        .await
        .unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/ml/predict/");
        assert_eq!(req.header("HOST"), Some("x"));
        assert_eq!(req.body, b"{}");
    }

    #[tokio::test]
    async fn missing_content_length_means_empty_body() {
        let req = parse("GET /ml/status HTTP/1.1\r\n\r\n", 1024).await.unwrap();
        assert!(req.body.is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_before_reading() {
        let err = parse("POST / HTTP/1.1\r\nContent-Length: 5000\r\n\r\n", 1024)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(413));
    }

    #[tokio::test]
    async fn garbage_request_line_is_malformed() {
        let err = parse("hello\r\n\r\n", 1024).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        let err = parse("GET / HTTP/1.1\r\nContent-Length: lots\r\n\r\n", 1024)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn chunked_body_is_decoded() {
        let req = parse(
            "POST /ml/predict/ HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n\
             15\r\n{\"inactivity_time\":1}\r\n0\r\n\r\n",
            1024,
        )
        .await
        .unwrap();
        assert_eq!(req.body, br#"{"inactivity_time":1}"#);
    }

    #[tokio::test]
    async fn chunked_body_across_chunks_with_extension_and_trailer() {
        let req = parse(
            "POST / HTTP/1.1\r\nTransfer-Encoding: Chunked\r\n\r\n\
             3;name=x\r\nabc\r\n2\r\nde\r\n0\r\nX-Trailer: 1\r\n\r\n",
            1024,
        )
        .await
        .unwrap();
        assert_eq!(req.body, b"abcde");
    }

    #[tokio::test]
    async fn chunked_body_is_held_to_the_limit() {
        let err = parse(
            "POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nabcd\r\n4\r\nefgh\r\n0\r\n\r\n",
            6,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), Some(413));
    }

    #[tokio::test]
    async fn bad_chunk_framing_is_malformed() {
        for raw in [
            "POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n",
            "POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n2\r\nabc\r\n0\r\n\r\n",
        ] {
            let err = parse(raw, 1024).await.unwrap_err();
            assert_eq!(err.status(), Some(400), "{raw:?}");
        }
    }

    #[tokio::test]
    async fn conflicting_or_unknown_framing_is_rejected() {
        let err = parse(
            "POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\nContent-Length: 3\r\n\r\nabc",
            1024,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), Some(400));

        let err = parse("POST / HTTP/1.1\r\nTransfer-Encoding: gzip\r\n\r\n", 1024)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(501));
    }

    #[tokio::test]
    async fn empty_stream_is_closed_connection() {
        assert!(matches!(
            parse("", 1024).await,
            Err(HttpError::ConnectionClosed)
        ));
    }

    #[test]
    fn response_encoding() {
        let bytes = Response::json(200, json!({ "ok": true })).to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 11\r\n"));
        assert!(text.ends_with("\r\n\r\n{\"ok\":true}"));

        let text = String::from_utf8(Response::error(405, "nope").with_allow("GET").to_bytes())
            .unwrap();
        assert!(text.contains("Allow: GET\r\n"));

        let text = String::from_utf8(Response::error(408, "slow").to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 408 Request Timeout\r\n"));
        assert_eq!(HttpError::TimedOut { secs: 5 }.status(), Some(408));
    }
}
