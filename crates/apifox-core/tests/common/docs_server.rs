//! Minimal HTTP/1.1 server that replays a script of replies for integration tests.
//!
//! Each incoming GET consumes the next reply; once the script is exhausted the
//! last reply repeats. Request paths are recorded so tests can count attempts.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub reason: &'static str,
    pub body: String,
    /// Sleep this long before answering (simulates a slow backend).
    pub delay: Duration,
}

impl Reply {
    pub fn new(status: u16, reason: &'static str, body: &str) -> Self {
        Self {
            status,
            reason,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::new(200, "OK", body)
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct DocsServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub base_url: String,
    paths: Arc<Mutex<Vec<String>>>,
}

impl DocsServer {
    /// Paths requested so far, in arrival order.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.paths.lock().unwrap().len()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(script: Vec<Reply>) -> DocsServer {
    assert!(!script.is_empty(), "script needs at least one reply");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let paths = Arc::new(Mutex::new(Vec::new()));
    let script = Arc::new(script);
    let recorded = Arc::clone(&paths);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let index = {
                let mut p = recorded.lock().unwrap();
                p.push(String::new());
                p.len() - 1
            };
            let reply = script[index.min(script.len() - 1)].clone();
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, index, &reply, &recorded));
        }
    });
    DocsServer {
        base_url: format!("http://127.0.0.1:{}", port),
        paths,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    index: usize,
    reply: &Reply,
    recorded: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    recorded.lock().unwrap()[index] = path;

    if !reply.delay.is_zero() {
        thread::sleep(reply.delay);
    }
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.reason,
        reply.body.len(),
        reply.body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// A local URL nothing listens on (bind, read the port, drop the listener).
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/nothing", port)
}
