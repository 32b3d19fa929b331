//! Integration test common infrastructure.
//!
//! A scripted server on the far end of an in-memory duplex pipe.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use slirc_presence::client::{self, ClientHandle};
use slirc_presence::{ClientError, Config};
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;
use tokio_util::codec::{Framed, LinesCodec};

pub struct FakeServer {
    lines: Framed<DuplexStream, LinesCodec>,
}

#[allow(dead_code)]
impl FakeServer {
    /// Next line the client wrote.
    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(300), self.lines.next())
            .await
            .expect("client went quiet")
            .expect("client closed the connection")
            .expect("read error")
    }

    pub async fn send(&mut self, line: &str) {
        self.lines.send(line).await.expect("write failed");
    }

    /// Write bytes as-is, bypassing the line encoder.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.lines
            .get_mut()
            .write_all(bytes)
            .await
            .expect("write failed");
    }

    /// Read NICK/USER, then welcome the client with `isupport` tokens.
    pub async fn register(&mut self, isupport: &str) {
        assert_eq!(self.recv().await, "NICK watcher");
        assert_eq!(self.recv().await, "USER watcher 0 * slirc-presence");
        self.send(":irc.test 001 watcher :Welcome to the test network")
            .await;
        if !isupport.is_empty() {
            self.send(&format!(
                ":irc.test 005 watcher {} :are supported by this server",
                isupport
            ))
            .await;
        }
        self.send(":irc.test 376 watcher :End of /MOTD command.")
            .await;
    }

    /// True once the client has hung up.
    pub async fn closed(&mut self) -> bool {
        matches!(
            tokio::time::timeout(Duration::from_secs(5), self.lines.next()).await,
            Ok(None)
        )
    }
}

pub fn config(contacts: &[&str]) -> Config {
    let list = contacts
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    toml::from_str(&format!(
        r#"
[server]
host = "irc.test"
nick = "watcher"

[presence]
poll_interval_secs = 30
contacts = [{}]
"#,
        list
    ))
    .expect("valid test config")
}

/// Spawn a client wired to a fresh [`FakeServer`].
pub fn start(config: Config) -> (FakeServer, ClientHandle, JoinHandle<Result<(), ClientError>>) {
    let (client_side, server_side) = tokio::io::duplex(16 * 1024);
    let (handle, task) = client::spawn(client_side, config);
    let server = FakeServer {
        lines: Framed::new(server_side, LinesCodec::new()),
    };
    (server, handle, task)
}
