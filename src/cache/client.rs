use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;
use tracing::debug;

use super::error::{Error, Result};

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

/// A handle to one server connection.
///
/// Calls on the same handle are serialised: each request and its reply are
/// exchanged under one lock, so a `Client` can be shared across tasks behind
/// an `Arc` without mixing up responses. Open several handles for
/// parallelism.
pub struct Client {
    // `None` once the handle has been closed.
    conn: Mutex<Option<Connection>>,
}

impl Client {
    /// Connects and discards the welcome banner.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        let mut conn = Connection {
            reader: BufReader::new(reader),
            writer: BufWriter::new(writer),
        };

        let mut banner = String::new();
        if let Err(err) = conn.reader.read_line(&mut banner).await {
            debug!(error = %err, "could not read welcome banner");
        }

        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Sends one raw command line and returns the reply without its line
    /// terminator. A command spanning several lines is refused, since the
    /// server would answer each line separately.
    pub async fn do_command(&self, command: &str) -> Result<String> {
        if command.contains(['\r', '\n']) {
            return Err(Error::InvalidArgument(
                "command must not contain line breaks".into(),
            ));
        }

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(Error::ConnectionClosed)?;

        conn.writer.write_all(command.as_bytes()).await?;
        conn.writer.write_all(b"\n").await?;
        conn.writer.flush().await?;

        let mut line = String::new();
        if conn.reader.read_line(&mut line).await? == 0 {
            return Err(Error::ConnectionClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Returns `Ok(None)` when the key does not exist.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        let reply = self.do_command(&format!("GET {key}")).await?;
        if reply == "NOTFOUND" {
            return Ok(None);
        }
        match reply.strip_prefix("OK ") {
            Some(value) => Ok(Some(value.to_string())),
            None => Err(Error::UnexpectedResponse(reply)),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        let reply = self.do_command(&format!("SET {key} {value}")).await?;
        expect_ok(reply)
    }

    pub async fn del(&self, key: &str) -> Result<()> {
        check_key(key)?;
        let reply = self.do_command(&format!("DEL {key}")).await?;
        expect_ok(reply)
    }

    /// Shuts the connection down and releases the socket. Later calls on
    /// the handle fail with [`Error::ConnectionClosed`]; closing again is a
    /// no-op.
    pub async fn close(&self) -> Result<()> {
        let Some(mut conn) = self.conn.lock().await.take() else {
            return Ok(());
        };
        match conn.writer.shutdown().await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

// Keys are a single token on the wire.
fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(Error::InvalidArgument(format!(
            "key {key:?} must be a non-empty token without whitespace"
        )));
    }
    Ok(())
}

fn expect_ok(reply: String) -> Result<()> {
    if reply.starts_with("OK") {
        Ok(())
    } else {
        Err(Error::UnexpectedResponse(reply))
    }
}
