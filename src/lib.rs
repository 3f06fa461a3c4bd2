//! An in-memory key-value cache served over a line-oriented TCP protocol.
//!
//! - [`cache::MemoryStore`] is the concurrent map every session shares.
//! - [`cache::parse_line`] and [`cache::Response`] translate between wire
//!   lines and commands.
//! - [`cache::Server`] accepts connections and spawns one session task per
//!   socket.
//! - [`cache::Client`] speaks the protocol from the other side.
//!
//! ```text
//! GET key | SET key value | DEL key | ECHO text | HELP | QUIT
//! ```

pub mod cache;
