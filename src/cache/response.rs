use std::fmt;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::ProtocolError;

pub const WELCOME_BANNER: &str = "Welcome to simple-cache TCP server. Type HELP for commands.";
pub const HELP_TEXT: &str = "Commands: GET key | SET key value | DEL key | ECHO text | HELP | QUIT";

const LINE_TERMINATOR: &str = "\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok,
    Value(String),
    NotFound,
    Text(String),
    Bye,
    Error(ProtocolError),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("OK"),
            Response::Value(value) => write!(f, "OK {value}"),
            Response::NotFound => f.write_str("NOTFOUND"),
            Response::Text(text) => f.write_str(text),
            Response::Bye => f.write_str("BYE"),
            Response::Error(err) => write!(f, "ERR {err}"),
        }
    }
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Response::Error(err)
    }
}

/// Appends `\r\n` unless the line already ends with it.
pub fn encode_line(line: &str) -> String {
    let mut encoded = String::with_capacity(line.len() + LINE_TERMINATOR.len());
    encoded.push_str(line);
    if !line.ends_with(LINE_TERMINATOR) {
        encoded.push_str(LINE_TERMINATOR);
    }
    encoded
}

/// Writes one terminated line and flushes so the peer sees it immediately.
pub async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(encode_line(line).as_bytes()).await?;
    writer.flush().await
}

pub async fn write_response<W>(writer: &mut W, response: &Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_line(writer, &response.to_string()).await
}
