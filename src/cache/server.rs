use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tracing::{info, warn};

use super::commands::handle_connection;
use super::error::{Error, Result};
use super::response::WELCOME_BANNER;
use super::store::SharedStore;

/// Accepts connections and runs one session task per socket.
pub struct Server {
    listener: TcpListener,
    store: SharedStore,
    banner: Arc<str>,
}

impl Server {
    pub fn new(listener: TcpListener, store: SharedStore) -> Self {
        Self {
            listener,
            store,
            banner: Arc::from(WELCOME_BANNER),
        }
    }

    pub async fn bind(addr: &str, store: SharedStore) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self::new(listener, store))
    }

    pub fn with_banner(mut self, banner: impl Into<Arc<str>>) -> Self {
        self.banner = banner.into();
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts until `shutdown` resolves. Sessions already running are left
    /// to finish on their own.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let Server {
            listener,
            store,
            banner,
        } = self;
        tokio::pin!(shutdown);

        loop {
            select! {
                _ = &mut shutdown => {
                    info!("listener shutting down");
                    break;
                }
                accept_result = listener.accept() => {
                    handle_accept_result(accept_result, &store, &banner);
                }
            }
        }

        Ok(())
    }

    pub async fn run_until_ctrl_c(self) -> Result<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = ?err, "failed to install ctrl-c handler");
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}

fn handle_accept_result(
    result: std::io::Result<(TcpStream, SocketAddr)>,
    store: &SharedStore,
    banner: &Arc<str>,
) {
    match result {
        Ok((stream, _peer)) => spawn_session(stream, store, banner),
        // Transient accept failures (e.g. EMFILE) must not stop the listener.
        Err(err) => warn!(error = ?err, "failed to accept connection"),
    }
}

fn spawn_session(stream: TcpStream, store: &SharedStore, banner: &Arc<str>) {
    let store = Arc::clone(store);
    let banner = Arc::clone(banner);
    tokio::spawn(async move {
        handle_connection(stream, store, &banner).await;
    });
}
