//! Scripted stand-in for a Transmission daemon, speaking just enough HTTP/1.1.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};

pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub head: String,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

pub fn reply(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status}\r\ncontent-length: {}\r\n", body.len());
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(body);
    out
}

/// What Transmission answers to a request without a session id
pub fn session(id: &str) -> String {
    reply("409 Conflict", &[(SESSION_ID_HEADER, id)], "")
}

pub fn json(body: &str) -> String {
    reply("200 OK", &[("content-type", "application/json")], body)
}

type Shared<T> = Arc<Mutex<T>>;

pub struct Daemon {
    pub url: String,
    pub port: u16,
    requests: Shared<Vec<Recorded>>,
}

impl Daemon {
    /// Answers incoming requests with `replies`, in order
    pub async fn start(replies: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://{addr}/transmission/rpc");

        let replies = Arc::new(Mutex::new(VecDeque::from(replies)));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, replies.clone(), recorded.clone()));
            }
        });

        Self {
            url,
            port: addr.port(),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(
    stream: TcpStream,
    replies: Shared<VecDeque<String>>,
    requests: Shared<Vec<Recorded>>,
) {
    let mut stream = BufReader::new(stream);

    loop {
        let mut head = String::new();
        loop {
            let mut line = String::new();
            match stream.read_line(&mut line).await {
                Ok(0) | Err(_) => return,
                Ok(_) => {}
            }
            if line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }

        let length = head
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                if key.trim().eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);

        let mut body = vec![0; length];
        if stream.read_exact(&mut body).await.is_err() {
            return;
        }

        requests.lock().unwrap().push(Recorded {
            head,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        let next = replies.lock().unwrap().pop_front();
        let Some(reply) = next else {
            return;
        };

        if stream.get_mut().write_all(reply.as_bytes()).await.is_err() {
            return;
        }
    }
}
