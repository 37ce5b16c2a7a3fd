//! Shared utilities for integration tests.

use std::net::SocketAddr;

use mock_echo_server::net::Listener;
use mock_echo_server::{CounterStore, HttpServer, ServerConfig, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A server running on an ephemeral port; stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    #[allow(dead_code)]
    pub counters: CounterStore,
    shutdown: Shutdown,
}

impl TestServer {
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Host header value a client would send.
    #[allow(dead_code)]
    pub fn host(&self) -> String {
        format!("localhost:{}", self.addr.port())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the echo server with logging of individual requests turned off.
pub async fn start_server() -> TestServer {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.observability.log_requests = false;
    config.shutdown.drain_timeout_secs = 1;

    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    let counters = server.counters().clone();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        counters,
        shutdown,
    }
}

/// A response read straight off the socket.
#[allow(dead_code)]
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[allow(dead_code)]
impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Write `raw` as-is and read until the server closes the connection.
///
/// The request must ask for `Connection: close`.
#[allow(dead_code)]
pub async fn raw_request(addr: SocketAddr, raw: &[u8]) -> RawResponse {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket.write_all(raw).await.unwrap();

    let mut bytes = Vec::new();
    socket.read_to_end(&mut bytes).await.unwrap();
    let text = String::from_utf8(bytes).unwrap();

    // skip interim 1xx responses
    let mut rest = text.as_str();
    loop {
        let (head, body) = rest.split_once("\r\n\r\n").unwrap();
        let mut lines = head.split("\r\n");
        let status: u16 = lines
            .next()
            .unwrap()
            .split(' ')
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        if (100..200).contains(&status) {
            rest = body;
            continue;
        }

        let headers = lines
            .filter_map(|l| l.split_once(": "))
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        return RawResponse {
            status,
            headers,
            body: body.to_string(),
        };
    }
}

/// Build a request from ordered header pairs, preserving them exactly.
#[allow(dead_code)]
pub fn build_request(method: &str, target: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut raw = format!("{} {} HTTP/1.1\r\n", method, target);
    for (name, value) in headers {
        raw.push_str(&format!("{}: {}\r\n", name, value));
    }
    raw.push_str("\r\n");
    raw.push_str(body);
    raw
}

/// Plain client without connection pooling surprises.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
