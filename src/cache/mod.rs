mod client;
mod commands;
mod config;
mod error;
mod request;
mod response;
mod server;
mod store;

pub use client::Client;
pub use commands::{handle_connection, run_session, SessionEnd};
pub use config::ServerConfig;
pub use error::{Error, ProtocolError, Result};
pub use request::{parse_line, Command};
pub use response::{encode_line, Response, HELP_TEXT, WELCOME_BANNER};
pub use server::Server;
pub use store::{KeyValueStore, MemoryStore, SharedStore};

#[cfg(test)]
mod tests;
