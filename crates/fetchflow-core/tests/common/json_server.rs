//! Minimal HTTP/1.1 server serving `/users` and `/posts` as JSON for integration tests.
//!
//! One request per connection (`Connection: close`). Behaviour knobs let a
//! test make the first requests fail, slow every response down or corrupt
//! the posts body.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fetchflow_core::api::{Post, User};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonServerOptions {
    /// The first N requests get `503 Service Unavailable`.
    pub fail_first: usize,
    /// Sleep before answering each request.
    pub response_delay: Option<Duration>,
    /// Serve `/posts` with a body that is not JSON.
    pub corrupt_posts: bool,
}

pub struct JsonServer {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345`.
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl JsonServer {
    /// Requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn users() -> Vec<User> {
    ["Ann", "Bob", "Cid", "Dee"]
        .iter()
        .enumerate()
        .map(|(i, name)| User {
            id: i as u64 + 1,
            name: name.to_string(),
            username: name.to_lowercase(),
            email: format!("{}@Example.com", name),
        })
        .collect()
}

/// Ann: 1 post, Bob: 3, Cid: 2, Dee: 0.
pub fn posts() -> Vec<Post> {
    [
        (1, 1, "lorem ipsum"),
        (2, 2, "dolor sit amet"),
        (3, 2, "Dolorem"),
        (4, 2, "qui est"),
        (5, 3, "sit aut"),
        (6, 3, "nesciunt"),
    ]
    .iter()
    .map(|(id, user_id, title)| Post {
        id: *id,
        user_id: *user_id,
        title: title.to_string(),
        body: "body".to_string(),
    })
    .collect()
}

pub fn start() -> JsonServer {
    start_with_options(JsonServerOptions::default())
}

pub fn start_with_options(opts: JsonServerOptions) -> JsonServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let seen = counter.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, seen, opts));
        }
    });
    JsonServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, seen: usize, opts: JsonServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]).to_string();
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    if let Some(d) = opts.response_delay {
        thread::sleep(d);
    }

    let (status, body) = if seen < opts.fail_first {
        ("503 Service Unavailable", b"{}".to_vec())
    } else {
        route(&target, opts)
    };
    let response = format!(
        concat!(
            "HTTP/1.1 {}\r\n",
            "Content-Type: application/json\r\n",
            "Content-Length: {}\r\n",
            "Connection: close\r\n\r\n",
        ),
        status,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
}

fn route(target: &str, opts: JsonServerOptions) -> (&'static str, Vec<u8>) {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    match path {
        "/users" => ("200 OK", serde_json::to_vec(&users()).unwrap()),
        "/posts" if opts.corrupt_posts => ("200 OK", b"<html>oops</html>".to_vec()),
        "/posts" => {
            let user_filter = query
                .split('&')
                .find_map(|kv| kv.strip_prefix("userId="))
                .and_then(|v| v.parse::<u64>().ok());
            let posts: Vec<Post> = posts()
                .into_iter()
                .filter(|p| user_filter.map_or(true, |u| p.user_id == u))
                .collect();
            ("200 OK", serde_json::to_vec(&posts).unwrap())
        }
        _ => {
            let user = path
                .strip_prefix("/users/")
                .and_then(|id| id.parse::<u64>().ok())
                .and_then(|id| users().into_iter().find(|u| u.id == id));
            match user {
                Some(u) => ("200 OK", serde_json::to_vec(&u).unwrap()),
                None => ("404 Not Found", b"{}".to_vec()),
            }
        }
    }
}
