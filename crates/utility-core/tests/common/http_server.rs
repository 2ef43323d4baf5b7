//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one mutable body with a configurable status. `/redirect` answers 302
//! to `/`. Every request's method and headers are recorded.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct Reply {
    status: &'static str,
    body: Vec<u8>,
}

/// Handle to a running server. The server runs until the process exits.
#[derive(Clone)]
pub struct TestServer {
    base: String,
    reply: Arc<Mutex<Reply>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl TestServer {
    /// Start serving `body` with 200 OK. Returns once the socket is bound.
    pub fn start(body: &[u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let server = TestServer {
            base: format!("http://127.0.0.1:{}", port),
            reply: Arc::new(Mutex::new(Reply {
                status: "200 OK",
                body: body.to_vec(),
            })),
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let shared = server.clone();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let shared = shared.clone();
                thread::spawn(move || shared.handle(stream));
            }
        });
        server
    }

    /// URL of the served body.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub fn set_body(&self, body: &[u8]) {
        self.reply.lock().unwrap().body = body.to_vec();
    }

    /// e.g. `"404 Not Found"`.
    pub fn set_status(&self, status: &'static str) {
        self.reply.lock().unwrap().status = status;
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn handle(&self, mut stream: std::net::TcpStream) {
        let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
        let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
        let mut buf = [0u8; 8192];
        let n = match stream.read(&mut buf) {
            Ok(0) => return,
            Ok(n) => n,
            Err(_) => return,
        };
        let request = match std::str::from_utf8(&buf[..n]) {
            Ok(s) => s,
            Err(_) => return,
        };
        let seen = parse_request(request);
        let path = seen.path.clone();
        self.seen.lock().unwrap().push(seen);

        if path == "/redirect" {
            let _ = stream.write_all(
                b"HTTP/1.1 302 Found\r\nLocation: /\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
            return;
        }

        let (status, body) = {
            let reply = self.reply.lock().unwrap();
            (reply.status, reply.body.clone())
        };
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(&body);
    }
}

fn parse_request(request: &str) -> SeenRequest {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("").to_string();
    let mut headers = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    SeenRequest {
        method,
        path,
        headers,
    }
}
