//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every GET with a fixed status and body, and counts requests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct TestServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    /// Number of requests served so far.
    #[allow(dead_code)]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `body` with `200 OK` on every request.
pub fn start(body: &[u8]) -> TestServer {
    start_with_status(200, "OK", body)
}

/// Serve `body` with the given status line on every request. The server
/// thread lives until the test process exits.
pub fn start_with_status(code: u16, reason: &'static str, body: &[u8]) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body.to_vec());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            counter.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, code, reason, &body));
        }
    });
    TestServer {
        url: format!("http://127.0.0.1:{}/uc?export=download&id=test", port),
        hits,
    }
}

fn handle(mut stream: TcpStream, code: u16, reason: &str, body: &[u8]) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    // read until the end of the request headers
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/csv; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        code,
        reason,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
