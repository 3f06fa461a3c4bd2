use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use super::error::ProtocolError;
use super::request::{parse_line, Command};
use super::response::{write_line, write_response, Response, HELP_TEXT};
use super::store::{KeyValueStore, SharedStore};

/// Why a session left the active state without an I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    PeerClosed,
}

enum Flow {
    Continue,
    Close,
}

/// Serves one accepted socket until QUIT, EOF or an I/O failure, then shuts
/// it down.
pub async fn handle_connection(mut socket: TcpStream, store: SharedStore, banner: &str) {
    let peer = socket
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    info!(%peer, "connection opened");

    let outcome = {
        let (reader, writer) = socket.split();
        run_session(BufReader::new(reader), writer, store.as_ref(), banner).await
    };

    match outcome {
        Ok(SessionEnd::Quit) => info!(%peer, "client quit"),
        Ok(SessionEnd::PeerClosed) => info!(%peer, "connection closed by peer"),
        Err(err) => warn!(%peer, error = %err, "connection closed with error"),
    }

    let _ = socket.shutdown().await;
}

/// The per-connection state machine: greet, then read, dispatch and answer
/// one line at a time, strictly in order.
pub async fn run_session<R, W>(
    mut reader: R,
    mut writer: W,
    store: &dyn KeyValueStore,
    banner: &str,
) -> io::Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_line(&mut writer, banner).await?;

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(SessionEnd::PeerClosed);
        }

        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) => parse_line(line),
            Err(_) => Some(Err(ProtocolError::InvalidUtf8)),
        };
        let command = match parsed {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(err)) => {
                debug!(error = %err, "rejected request");
                write_response(&mut writer, &Response::from(err)).await?;
                continue;
            }
        };

        debug!(?command, "dispatching");
        let (response, flow) = execute(command, store);
        write_response(&mut writer, &response).await?;

        if let Flow::Close = flow {
            return Ok(SessionEnd::Quit);
        }
    }
}

fn execute(command: Command, store: &dyn KeyValueStore) -> (Response, Flow) {
    let response = match command {
        Command::Get { key } => match store.get(&key) {
            Some(value) => Response::Value(value),
            None => Response::NotFound,
        },
        Command::Set { key, value } => {
            store.set(key, value);
            Response::Ok
        }
        Command::Del { key } => {
            store.delete(&key);
            Response::Ok
        }
        Command::Echo { text } => Response::Text(text),
        Command::Help => Response::Text(HELP_TEXT.to_string()),
        Command::Quit => return (Response::Bye, Flow::Close),
    };
    (response, Flow::Continue)
}

#[cfg(test)]
mod tests {
    use tokio::io::{duplex, AsyncReadExt};

    use super::*;
    use crate::cache::response::WELCOME_BANNER;
    use crate::cache::store::MemoryStore;

    async fn transcript(input: &str, store: &MemoryStore) -> (SessionEnd, String) {
        transcript_bytes(input.as_bytes(), store).await
    }

    async fn transcript_bytes(input: &[u8], store: &MemoryStore) -> (SessionEnd, String) {
        let (mut client, server) = duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);

        client
            .write_all(input)
            .await
            .expect("write input");
        client.shutdown().await.expect("close client write side");

        let end = run_session(BufReader::new(server_read), server_write, store, WELCOME_BANNER)
            .await
            .expect("session should succeed");

        let mut output = String::new();
        client
            .read_to_string(&mut output)
            .await
            .expect("read output");
        (end, output)
    }

    #[tokio::test]
    async fn greets_then_answers_in_order() {
        let store = MemoryStore::new();
        let (end, output) = transcript("SET k v\r\nGET k\nDEL k\nGET k\n", &store).await;

        assert_eq!(end, SessionEnd::PeerClosed);
        assert_eq!(
            output,
            format!("{WELCOME_BANNER}\r\nOK\r\nOK v\r\nOK\r\nNOTFOUND\r\n")
        );
    }

    #[tokio::test]
    async fn quit_stops_reading_further_lines() {
        let store = MemoryStore::new();
        let (end, output) = transcript("quit\nSET after quit\n", &store).await;

        assert_eq!(end, SessionEnd::Quit);
        assert!(output.ends_with("BYE\r\n"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn blank_lines_produce_no_reply() {
        let store = MemoryStore::new();
        let (_, output) = transcript("\n   \r\nECHO a b  c\n", &store).await;

        assert_eq!(output, format!("{WELCOME_BANNER}\r\na b  c\r\n"));
    }

    #[tokio::test]
    async fn protocol_errors_keep_session_open() {
        let store = MemoryStore::new();
        let (end, output) = transcript("GET\nSET onlykey\nFOO\nHELP\n", &store).await;

        assert_eq!(end, SessionEnd::PeerClosed);
        let lines: Vec<&str> = output.split("\r\n").collect();
        assert_eq!(
            lines,
            vec![
                WELCOME_BANNER,
                "ERR missing key",
                "ERR usage: SET key value",
                "ERR unknown command",
                HELP_TEXT,
                "",
            ]
        );
    }

    #[tokio::test]
    async fn invalid_utf8_is_rejected_without_closing() {
        let store = MemoryStore::new();
        let (end, output) = transcript_bytes(b"ECHO \xff\xfe\nSET k  v\nGET k\n", &store).await;

        assert_eq!(end, SessionEnd::PeerClosed);
        assert_eq!(
            output,
            format!("{WELCOME_BANNER}\r\nERR invalid UTF-8 in request\r\nOK\r\nOK  v\r\n")
        );
        assert_eq!(store.get("k").as_deref(), Some(" v"));
    }
}
