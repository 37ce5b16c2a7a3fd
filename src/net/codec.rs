//! HTTP/1.1 wire codec.
//!
//! # Responsibilities
//! - Read request heads with `httparse`, keeping raw header order and casing
//! - Frame request bodies (`Content-Length` or chunked) and answer
//!   `Expect: 100-continue`
//! - Decide keep-alive per request
//! - Serialize responses, adding framing headers stages did not set
//!
//! # Design Decisions
//! - One buffer per connection; bytes past the current request stay for the next
//! - Head and body limits are enforced while reading, never after
//! - Bodies are fully buffered before the request is dispatched

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
};
use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::LimitsConfig;
use crate::http::request::{decode_octets, RawHeader, RequestHead};

/// Longest chunk-size or trailer line accepted.
const MAX_LINE_BYTES: usize = 4096;

/// Error type for wire-level failures.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("connection I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed mid-request")]
    UnexpectedEof,

    #[error("request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    #[error("too many request headers")]
    TooManyHeaders,

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    #[error("failed to collect response body: {0}")]
    ResponseBody(#[source] axum::Error),
}

impl CodecError {
    /// Status to answer with before closing, if the peer can still be told.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CodecError::HeadTooLarge(_) | CodecError::TooManyHeaders => {
                Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)
            }
            CodecError::Malformed(_) => Some(StatusCode::BAD_REQUEST),
            CodecError::BodyTooLarge(_) => Some(StatusCode::PAYLOAD_TOO_LARGE),
            _ => None,
        }
    }
}

/// How the request body is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFraming {
    Empty,
    Length(usize),
    Chunked,
}

/// Owned copy of a parsed request head.
struct ParsedHead {
    method: String,
    /// Raw target octets; decoded for the head, percent-encoded for the `Uri`.
    target: Vec<u8>,
    minor_version: u8,
    headers: Vec<(String, Vec<u8>)>,
}

impl ParsedHead {
    fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    fn has_token(&self, name: &str, token: &str) -> bool {
        self.header_values(name)
            .flat_map(|v| v.split(|&b| b == b','))
            .any(|t| t.trim_ascii().eq_ignore_ascii_case(token.as_bytes()))
    }

    fn keep_alive(&self) -> bool {
        if self.minor_version == 0 {
            self.has_token("connection", "keep-alive")
        } else {
            !self.has_token("connection", "close")
        }
    }

    fn expects_continue(&self) -> bool {
        self.minor_version >= 1
            && self
                .header_values("expect")
                .any(|v| v.trim_ascii().eq_ignore_ascii_case(b"100-continue"))
    }

    fn framing(&self) -> Result<BodyFraming, CodecError> {
        if let Some(last) = self
            .header_values("transfer-encoding")
            .flat_map(|v| v.split(|&b| b == b','))
            .map(<[u8]>::trim_ascii)
            .filter(|t| !t.is_empty())
            .last()
        {
            return if last.eq_ignore_ascii_case(b"chunked") {
                Ok(BodyFraming::Chunked)
            } else {
                Err(CodecError::Malformed("unsupported transfer-encoding".into()))
            };
        }

        let mut length = None;
        for value in self.header_values("content-length") {
            let parsed = std::str::from_utf8(value)
                .ok()
                .map(str::trim)
                .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or_else(|| CodecError::Malformed("invalid content-length".into()))?;
            match length {
                Some(previous) if previous != parsed => {
                    return Err(CodecError::Malformed("conflicting content-length".into()));
                }
                _ => length = Some(parsed),
            }
        }

        Ok(match length {
            Some(0) | None => BodyFraming::Empty,
            Some(n) => BodyFraming::Length(n),
        })
    }

    fn request_head(&self) -> RequestHead {
        RequestHead {
            method: self.method.clone(),
            target: decode_octets(&self.target),
            version: format!("1.{}", self.minor_version),
            raw_headers: self
                .headers
                .iter()
                .map(|(name, value)| RawHeader::new(name.as_str(), decode_octets(value)))
                .collect(),
        }
    }

    fn into_request(self, body: Bytes) -> Result<Request<Body>, CodecError> {
        let head = self.request_head();
        let version = if self.minor_version == 0 {
            Version::HTTP_10
        } else {
            Version::HTTP_11
        };

        let mut builder = Request::builder()
            .method(self.method.as_str())
            .uri(request_uri(&self.target)?)
            .version(version);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_slice());
        }

        let mut request = builder
            .body(Body::from(body))
            .map_err(|e| CodecError::Malformed(e.to_string()))?;
        request.extensions_mut().insert(head);
        Ok(request)
    }
}

/// A request read off the wire, ready for dispatch.
#[derive(Debug)]
pub struct IncomingRequest {
    pub request: Request<Body>,
    /// Client allows the connection to stay open afterwards.
    pub keep_alive: bool,
    /// `HEAD` request: the response body must not be sent.
    pub head_only: bool,
}

/// One HTTP/1.1 connection.
pub struct HttpConnection<S> {
    io: S,
    buf: BytesMut,
    max_header_bytes: usize,
    max_headers: usize,
    max_body_bytes: usize,
    keep_alive_secs: u64,
}

impl<S> HttpConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a new connection over `io` with the configured limits.
    pub fn new(io: S, limits: &LimitsConfig) -> Self {
        Self {
            io,
            buf: BytesMut::with_capacity(8 * 1024),
            max_header_bytes: limits.max_header_bytes,
            max_headers: limits.max_headers,
            max_body_bytes: limits.max_body_bytes,
            keep_alive_secs: limits.keep_alive_secs,
        }
    }

    /// Read the next request.
    ///
    /// Returns `Ok(None)` when the peer closes cleanly between requests or,
    /// with `idle` set, stays silent that long before sending anything.
    pub async fn read_request(
        &mut self,
        idle: Option<Duration>,
    ) -> Result<Option<IncomingRequest>, CodecError> {
        let Some(head) = self.read_head(idle).await? else {
            return Ok(None);
        };

        let framing = head.framing()?;
        if let BodyFraming::Length(n) = framing {
            if n > self.max_body_bytes {
                return Err(CodecError::BodyTooLarge(self.max_body_bytes));
            }
        }

        if framing != BodyFraming::Empty && head.expects_continue() {
            self.io.write_all(b"HTTP/1.1 100 Continue\r\n\r\n").await?;
            self.io.flush().await?;
        }

        let body = match framing {
            BodyFraming::Empty => Bytes::new(),
            BodyFraming::Length(n) => self.read_exact_body(n).await?,
            BodyFraming::Chunked => self.read_chunked_body().await?,
        };

        let keep_alive = head.keep_alive();
        let head_only = head.method.eq_ignore_ascii_case("HEAD");
        Ok(Some(IncomingRequest {
            request: head.into_request(body)?,
            keep_alive,
            head_only,
        }))
    }

    async fn read_head(&mut self, idle: Option<Duration>) -> Result<Option<ParsedHead>, CodecError> {
        loop {
            if let Some(head) = self.try_parse_head()? {
                return Ok(Some(head));
            }

            let between_requests = self.buf.iter().all(|&b| b == b'\r' || b == b'\n');
            let read = match idle {
                Some(idle) if between_requests => {
                    match tokio::time::timeout(idle, self.io.read_buf(&mut self.buf)).await {
                        Ok(read) => read?,
                        Err(_) => return Ok(None),
                    }
                }
                _ => self.io.read_buf(&mut self.buf).await?,
            };

            if read == 0 {
                return if self.buf.iter().all(|&b| b == b'\r' || b == b'\n') {
                    Ok(None)
                } else {
                    Err(CodecError::UnexpectedEof)
                };
            }
        }
    }

    fn try_parse_head(&mut self) -> Result<Option<ParsedHead>, CodecError> {
        if self.buf.is_empty() {
            return Ok(None);
        }

        let mut headers = vec![httparse::EMPTY_HEADER; self.max_headers];
        let mut req = httparse::Request::new(&mut headers);
        let head_len = match req.parse(&self.buf) {
            Ok(httparse::Status::Complete(len)) => len,
            Ok(httparse::Status::Partial) => {
                if self.buf.len() > self.max_header_bytes {
                    return Err(CodecError::HeadTooLarge(self.max_header_bytes));
                }
                return Ok(None);
            }
            Err(httparse::Error::TooManyHeaders) => return Err(CodecError::TooManyHeaders),
            Err(e) => return Err(CodecError::Malformed(e.to_string())),
        };

        if head_len > self.max_header_bytes {
            return Err(CodecError::HeadTooLarge(self.max_header_bytes));
        }

        let head = ParsedHead {
            method: req.method.unwrap_or_default().to_string(),
            target: req.path.unwrap_or_default().as_bytes().to_vec(),
            minor_version: req.version.unwrap_or(1),
            headers: req
                .headers
                .iter()
                .map(|h| (h.name.to_string(), h.value.to_vec()))
                .collect(),
        };

        self.buf.advance(head_len);
        Ok(Some(head))
    }

    async fn fill(&mut self) -> Result<(), CodecError> {
        if self.io.read_buf(&mut self.buf).await? == 0 {
            return Err(CodecError::UnexpectedEof);
        }
        Ok(())
    }

    async fn read_exact_body(&mut self, len: usize) -> Result<Bytes, CodecError> {
        while self.buf.len() < len {
            self.fill().await?;
        }
        Ok(self.buf.split_to(len).freeze())
    }

    async fn read_line(&mut self) -> Result<BytesMut, CodecError> {
        loop {
            if let Some(pos) = self.buf.windows(2).position(|w| w == b"\r\n") {
                let line = self.buf.split_to(pos);
                self.buf.advance(2);
                return Ok(line);
            }
            if self.buf.len() > MAX_LINE_BYTES {
                return Err(CodecError::Malformed("chunk line too long".into()));
            }
            self.fill().await?;
        }
    }

    async fn read_chunked_body(&mut self) -> Result<Bytes, CodecError> {
        let mut body = BytesMut::new();
        loop {
            let line = self.read_line().await?;
            let size = std::str::from_utf8(&line)
                .ok()
                .and_then(|l| l.split(';').next())
                .map(str::trim)
                .and_then(|s| usize::from_str_radix(s, 16).ok())
                .ok_or_else(|| CodecError::Malformed("invalid chunk size".into()))?;

            if size == 0 {
                // trailers are read and dropped
                while !self.read_line().await?.is_empty() {}
                return Ok(body.freeze());
            }

            if body.len().saturating_add(size) > self.max_body_bytes {
                return Err(CodecError::BodyTooLarge(self.max_body_bytes));
            }

            while self.buf.len() < size + 2 {
                self.fill().await?;
            }
            body.extend_from_slice(&self.buf[..size]);
            if &self.buf[size..size + 2] != b"\r\n" {
                return Err(CodecError::Malformed("missing chunk terminator".into()));
            }
            self.buf.advance(size + 2);
        }
    }

    /// Write `response`; returns whether the connection may be reused.
    pub async fn write_response(
        &mut self,
        response: Response,
        head_only: bool,
        keep_alive: bool,
    ) -> Result<bool, CodecError> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(CodecError::ResponseBody)?;

        let status = parts.status;
        let close = !keep_alive || connection_has_close(&parts.headers);
        let bodyless = status.is_informational()
            || status == StatusCode::NO_CONTENT
            || status == StatusCode::NOT_MODIFIED;

        let mut out = BytesMut::with_capacity(512 + body.len());
        out.extend_from_slice(
            format!(
                "HTTP/1.1 {} {}\r\n",
                status.as_str(),
                status.canonical_reason().unwrap_or("")
            )
            .as_bytes(),
        );

        if !parts.headers.contains_key(header::DATE) {
            put_header(&mut out, "date", http_date().as_bytes());
        }
        if !parts.headers.contains_key(header::CONNECTION) {
            if close {
                put_header(&mut out, "connection", b"close");
            } else {
                put_header(&mut out, "connection", b"keep-alive");
                let timeout = format!("timeout={}", self.keep_alive_secs);
                put_header(&mut out, "keep-alive", timeout.as_bytes());
            }
        }
        if !bodyless && !parts.headers.contains_key(header::CONTENT_LENGTH) {
            put_header(&mut out, "content-length", body.len().to_string().as_bytes());
        }
        for (name, value) in parts.headers.iter() {
            put_header(&mut out, name.as_str(), value.as_bytes());
        }
        out.extend_from_slice(b"\r\n");

        if !bodyless && !head_only {
            out.extend_from_slice(&body);
        }

        self.io.write_all(&out).await?;
        self.io.flush().await?;
        Ok(!close)
    }

    /// Answer a request that could not be read, then give up on the connection.
    pub async fn write_error(&mut self, status: StatusCode, message: String) -> Result<(), CodecError> {
        let response = (status, message).into_response();
        self.write_response(response, false, false).await.map(|_| ())
    }

    pub async fn shutdown(&mut self) -> Result<(), CodecError> {
        self.io.shutdown().await?;
        Ok(())
    }
}

/// `Uri` for the router; octets `Uri` refuses are percent-encoded.
///
/// The descriptor keeps the raw target, so this only affects routing.
fn request_uri(target: &[u8]) -> Result<Uri, CodecError> {
    if let Ok(uri) = Uri::try_from(target) {
        return Ok(uri);
    }

    let mut encoded = String::with_capacity(target.len() * 3);
    for &b in target {
        if b.is_ascii_graphic() && !b"\"<>\\^`{|}".contains(&b) {
            encoded.push(char::from(b));
        } else {
            encoded.push_str(&format!("%{b:02X}"));
        }
    }
    Uri::try_from(encoded).map_err(|e| CodecError::Malformed(e.to_string()))
}

fn put_header(out: &mut BytesMut, name: &str, value: &[u8]) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value);
    out.extend_from_slice(b"\r\n");
}

fn connection_has_close(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .flat_map(|v| v.as_bytes().split(|&b| b == b','))
        .any(|t| t.trim_ascii().eq_ignore_ascii_case(b"close"))
}

/// IMF-fixdate for the `Date` header.
fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    fn limits() -> LimitsConfig {
        LimitsConfig {
            max_header_bytes: 1024,
            max_headers: 16,
            max_body_bytes: 64,
            keep_alive_secs: 5,
        }
    }

    async fn read_one(raw: &[u8], limits: LimitsConfig) -> Result<Option<IncomingRequest>, CodecError> {
        let (mut client, server) = duplex(64 * 1024);
        client.write_all(raw).await.unwrap();
        client.shutdown().await.unwrap();
        let mut conn = HttpConnection::new(server, &limits);
        conn.read_request(Some(Duration::from_secs(1))).await
    }

    #[tokio::test]
    async fn keeps_raw_header_order_and_case() {
        let raw = b"GET /foo?x=1 HTTP/1.1\r\nHost: localhost\r\nX-Dup: a\r\nx-dup: b\r\n\r\n";
        let incoming = read_one(raw, limits()).await.unwrap().unwrap();

        let head = incoming.request.extensions().get::<RequestHead>().unwrap();
        assert_eq!(head.method, "GET");
        assert_eq!(head.target, "/foo?x=1");
        assert_eq!(head.version, "1.1");
        assert_eq!(
            head.raw_headers,
            vec![
                RawHeader::new("Host", "localhost"),
                RawHeader::new("X-Dup", "a"),
                RawHeader::new("x-dup", "b"),
            ]
        );
        assert_eq!(crate::pipeline::size::request_size(head), raw.len());
        assert!(incoming.keep_alive);
        assert!(!incoming.head_only);
    }

    #[tokio::test]
    async fn non_ascii_target_is_sized_in_octets() {
        let raw = b"GET /caf\xc3\xa9 HTTP/1.1\r\nHost: x\r\n\r\n";
        let incoming = read_one(raw, limits()).await.unwrap().unwrap();

        let head = incoming.request.extensions().get::<RequestHead>().unwrap();
        assert_eq!(head.target, "/caf\u{c3}\u{a9}");
        assert_eq!(crate::pipeline::size::request_size(head), raw.len());
        assert_eq!(incoming.request.uri(), "/caf%C3%A9");
    }

    #[tokio::test]
    async fn target_rejected_by_uri_still_reaches_handler() {
        let raw = b"GET /q?a=\"1\" HTTP/1.1\r\n\r\n";
        let incoming = read_one(raw, limits()).await.unwrap().unwrap();

        let head = incoming.request.extensions().get::<RequestHead>().unwrap();
        assert_eq!(head.target, "/q?a=\"1\"");
        assert_eq!(incoming.request.uri().path(), "/q");
    }

    #[tokio::test]
    async fn first_request_is_not_subject_to_idle_timeout() {
        let (mut client, server) = duplex(64 * 1024);
        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            client.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
            client
        });

        let mut conn = HttpConnection::new(server, &limits());
        let incoming = conn.read_request(None).await.unwrap();
        assert!(incoming.is_some());

        let _client = writer.await.unwrap();
        let next = conn.read_request(Some(Duration::from_millis(20))).await.unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn reads_content_length_body() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let incoming = read_one(raw, limits()).await.unwrap().unwrap();
        let body = axum::body::to_bytes(incoming.request.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn reads_chunked_body() {
        let raw = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5;ext=1\r\nhello\r\n6\r\n world\r\n0\r\nX-Trailer: t\r\n\r\n";
        let incoming = read_one(raw, limits()).await.unwrap().unwrap();
        let body = axum::body::to_bytes(incoming.request.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hello world");
    }

    #[tokio::test]
    async fn http10_closes_by_default() {
        let incoming = read_one(b"GET / HTTP/1.0\r\n\r\n", limits()).await.unwrap().unwrap();
        assert!(!incoming.keep_alive);

        let incoming = read_one(b"GET / HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n", limits())
            .await
            .unwrap()
            .unwrap();
        assert!(incoming.keep_alive);

        let incoming = read_one(b"HEAD / HTTP/1.1\r\nConnection: close\r\n\r\n", limits())
            .await
            .unwrap()
            .unwrap();
        assert!(!incoming.keep_alive);
        assert!(incoming.head_only);
    }

    #[tokio::test]
    async fn clean_eof_is_not_an_error() {
        assert!(read_one(b"", limits()).await.unwrap().is_none());
        assert!(matches!(
            read_one(b"GET / HT", limits()).await,
            Err(CodecError::UnexpectedEof)
        ));
    }

    #[tokio::test]
    async fn enforces_limits() {
        let big_header = format!("GET / HTTP/1.1\r\nX-Big: {}\r\n\r\n", "a".repeat(2048));
        let err = read_one(big_header.as_bytes(), limits()).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE));

        let mut many = String::from("GET / HTTP/1.1\r\n");
        for i in 0..20 {
            many.push_str(&format!("H{i}: v\r\n"));
        }
        many.push_str("\r\n");
        let err = read_one(many.as_bytes(), limits()).await.unwrap_err();
        assert!(matches!(err, CodecError::TooManyHeaders));

        let err = read_one(b"POST / HTTP/1.1\r\nContent-Length: 100\r\n\r\n", limits())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::PAYLOAD_TOO_LARGE));

        let err = read_one(b"POST / HTTP/1.1\r\nContent-Length: nope\r\n\r\n", limits())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn pipelined_requests_are_split() {
        let (mut client, server) = duplex(64 * 1024);
        client
            .write_all(b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n")
            .await
            .unwrap();
        client.shutdown().await.unwrap();

        let mut conn = HttpConnection::new(server, &limits());
        let idle = Some(Duration::from_secs(1));
        let first = conn.read_request(idle).await.unwrap().unwrap();
        let second = conn.read_request(idle).await.unwrap().unwrap();
        assert_eq!(first.request.uri(), "/a");
        assert_eq!(second.request.uri(), "/b");
        assert!(conn.read_request(idle).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn writes_framing_headers() {
        let (mut client, server) = duplex(64 * 1024);
        let mut conn = HttpConnection::new(server, &limits());

        let mut response = (StatusCode::CREATED, "{}").into_response();
        response
            .headers_mut()
            .insert("foo", axum::http::HeaderValue::from_static("bar"));
        let reusable = conn.write_response(response, false, true).await.unwrap();
        assert!(reusable);
        drop(conn);

        let mut written = String::new();
        client.read_to_string(&mut written).await.unwrap();
        assert!(written.starts_with("HTTP/1.1 201 Created\r\n"));
        assert!(written.contains("\r\nconnection: keep-alive\r\n"));
        assert!(written.contains("\r\ncontent-length: 2\r\n"));
        assert!(written.contains("\r\nfoo: bar\r\n"));
        assert!(written.contains("\r\ndate: "));
        assert!(written.ends_with("\r\n\r\n{}"));
    }

    #[tokio::test]
    async fn head_and_no_content_omit_body() {
        let (mut client, server) = duplex(64 * 1024);
        let mut conn = HttpConnection::new(server, &limits());

        let reusable = conn
            .write_response((StatusCode::OK, "hidden").into_response(), true, false)
            .await
            .unwrap();
        assert!(!reusable);
        conn.write_response((StatusCode::NO_CONTENT, "gone").into_response(), false, true)
            .await
            .unwrap();
        drop(conn);

        let mut written = String::new();
        client.read_to_string(&mut written).await.unwrap();
        assert!(written.contains("content-length: 6\r\n"));
        assert!(!written.contains("hidden"));
        assert!(!written.contains("gone"));
        assert!(written.contains("HTTP/1.1 204 No Content\r\n"));
    }

    #[tokio::test]
    async fn nonstandard_status_has_empty_reason() {
        let (mut client, server) = duplex(64 * 1024);
        let mut conn = HttpConnection::new(server, &limits());
        let status = StatusCode::from_u16(299).unwrap();
        conn.write_response((status, "").into_response(), false, false)
            .await
            .unwrap();
        drop(conn);

        let mut written = String::new();
        client.read_to_string(&mut written).await.unwrap();
        assert!(written.starts_with("HTTP/1.1 299 \r\n"));
    }
}
