//! Local HTTP endpoint serving canned Cloudflare API responses.
//!
//! Each canned `(status, body)` pair answers exactly one connection, in
//! order. The recorded requests are returned by [`CannedServer::finish`].

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use serde_json::Value;

/// Envelope returned by create and update for `192.168.0.0/26` in `vnet-1`.
pub const ROUTE_BODY: &str = r#"{"success":true,"errors":[],"messages":[],"result":
    {"network":"192.168.0.0/26","tunnel_id":"tun-1","comment":"office","virtual_network_id":"vnet-1"}}"#;

/// List envelope holding the same route.
pub const LIST_BODY: &str = r#"{"success":true,"errors":[],"messages":[],"result":[
    {"network":"192.168.0.0/26","tunnel_id":"tun-1","tunnel_name":"edge","comment":"office","virtual_network_id":"vnet-1"}]}"#;

/// Envelope returned by a successful delete.
pub const EMPTY_BODY: &str = r#"{"success":true,"errors":[],"messages":[],"result":null}"#;

#[derive(Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|err| panic!("request body should be JSON ({}): {err}", self.body))
    }
}

pub struct CannedServer {
    pub base_url: String,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl CannedServer {
    /// Serves one connection per canned `(status, body)` pair, in order.
    pub fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("bind local listener: {err}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("listener address: {err}"));
        let handle = thread::spawn(move || {
            responses
                .into_iter()
                .map(|(status, body)| serve_one(&listener, status, body))
                .collect()
        });
        Self {
            base_url: format!("http://{addr}/client/v4"),
            handle,
        }
    }

    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle
            .join()
            .unwrap_or_else(|_| panic!("canned server thread panicked"))
    }
}

fn serve_one(listener: &TcpListener, status: u16, body: &str) -> RecordedRequest {
    let (stream, _) = listener
        .accept()
        .unwrap_or_else(|err| panic!("accept connection: {err}"));
    let mut reader = BufReader::new(
        stream
            .try_clone()
            .unwrap_or_else(|err| panic!("clone stream: {err}")),
    );

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .unwrap_or_else(|err| panic!("read request line: {err}"));
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let target = parts.next().unwrap_or_default().to_owned();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .unwrap_or_else(|err| panic!("read header: {err}"));
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            headers.push((name.trim().to_owned(), value.trim().to_owned()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut payload = vec![0_u8; length];
    reader
        .read_exact(&mut payload)
        .unwrap_or_else(|err| panic!("read body: {err}"));

    let mut writer = stream;
    write!(
        writer,
        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .unwrap_or_else(|err| panic!("write response: {err}"));
    writer
        .flush()
        .unwrap_or_else(|err| panic!("flush response: {err}"));

    RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&payload).into_owned(),
    }
}
