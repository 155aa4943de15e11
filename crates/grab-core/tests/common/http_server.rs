//! Minimal HTTP/1.1 server for pipeline integration tests.
//!
//! Serves one static body. HEAD answers with headers only; GET streams the
//! body, optionally in delayed chunks or cut short. One request per
//! connection, then the connection closes.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// What the HEAD response says about the body length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadLength {
    Exact,
    Missing,
    NotANumber,
}

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    pub head_status: u16,
    pub get_status: u16,
    pub head_length: HeadLength,
    /// Close the GET connection after this many body bytes (Content-Length still announces all).
    pub truncate_at: Option<usize>,
    /// Send the GET body in chunks of this size, sleeping `chunk_delay` before each chunk after the first.
    pub chunk_size: usize,
    pub chunk_delay: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            head_status: 200,
            get_status: 200,
            head_length: HeadLength::Exact,
            truncate_at: None,
            chunk_size: 64 * 1024,
            chunk_delay: Duration::ZERO,
        }
    }
}

/// Request counters and the last GET's `Accept-Encoding`, shared with the server threads.
#[derive(Default)]
struct Seen {
    heads: AtomicUsize,
    gets: AtomicUsize,
    get_accept_encoding: Mutex<Option<String>>,
}

/// Handle to a running server. The server lives until the process exits.
pub struct TestServer {
    base: String,
    seen: Arc<Seen>,
}

impl TestServer {
    /// URL of `path` on this server, e.g. `url("dir/file.bin")`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn head_requests(&self) -> usize {
        self.seen.heads.load(Ordering::SeqCst)
    }

    pub fn get_requests(&self) -> usize {
        self.seen.gets.load(Ordering::SeqCst)
    }

    /// `Accept-Encoding` sent with the most recent GET, if any.
    pub fn get_accept_encoding(&self) -> Option<String> {
        self.seen.get_accept_encoding.lock().unwrap().clone()
    }
}

pub fn start(body: Vec<u8>) -> TestServer {
    start_with_options(body, ServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let seen = Arc::new(Seen::default());
    let shared = Arc::clone(&seen);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let seen = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &body, opts, &seen));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}/", port),
        seen,
    }
}

/// A URL on a port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/file.bin", port)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn handle(
    mut stream: TcpStream,
    body: &[u8],
    opts: ServerOptions,
    seen: &Seen,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let method = request.method;

    if method.eq_ignore_ascii_case("HEAD") {
        seen.heads.fetch_add(1, Ordering::SeqCst);
        let length = match opts.head_length {
            HeadLength::Exact => format!("Content-Length: {}\r\n", body.len()),
            HeadLength::Missing => String::new(),
            HeadLength::NotANumber => "Content-Length: about-a-megabyte\r\n".to_string(),
        };
        let response = format!(
            "HTTP/1.1 {} {}\r\n{}Connection: close\r\n\r\n",
            opts.head_status,
            reason(opts.head_status),
            length
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.shutdown(Shutdown::Write);
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        seen.gets.fetch_add(1, Ordering::SeqCst);
        *seen.get_accept_encoding.lock().unwrap() = request.accept_encoding;
        if opts.get_status != 200 {
            let msg = b"no such file";
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                opts.get_status,
                reason(opts.get_status),
                msg.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(msg);
            let _ = stream.shutdown(Shutdown::Write);
            return;
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        if stream.write_all(response.as_bytes()).is_err() {
            return;
        }
        let send = &body[..opts.truncate_at.unwrap_or(body.len()).min(body.len())];
        for (i, chunk) in send.chunks(opts.chunk_size.max(1)).enumerate() {
            if i > 0 && !opts.chunk_delay.is_zero() {
                thread::sleep(opts.chunk_delay);
            }
            if stream.write_all(chunk).is_err() {
                return;
            }
        }
        let _ = stream.flush();
        let _ = stream.shutdown(Shutdown::Write);
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
}

struct Request {
    method: String,
    accept_encoding: Option<String>,
}

/// Reads the request head; keeps the method and the `Accept-Encoding` header.
fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        head.extend_from_slice(&buf[..n]);
    }
    let text = std::str::from_utf8(&head).ok()?;
    let method = text.split_whitespace().next()?.to_string();
    let accept_encoding = text.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("accept-encoding")
            .then(|| value.trim().to_string())
    });
    Some(Request {
        method,
        accept_encoding,
    })
}
