//! HTTP server implementation.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::logging::{REQUEST, RESPONSE};
use crate::parser::{framing, parse_request};
use crate::server::config::{ReadMode, ServerConfig};
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::router::Router;
use crate::server::store::{DiskStore, FileStore};
use crate::server::writer::write_response;

/// An HTTP server.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The router shared by all connections.
    pub router: Arc<Router>,
}

/// A server whose listener is bound but not yet accepting.
pub struct BoundServer {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    router: Arc<Router>,
}

impl HttpServer {
    /// Create a new HTTP server serving files from `config.storage_root`.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(DiskStore::new(config.storage_root.clone()));
        Self::with_store(config, store)
    }

    /// Create a new HTTP server with a custom file store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn FileStore>) -> Self {
        let router = Arc::new(Router::new(store, config.user_agent_policy));
        Self { config, router }
    }

    /// Log the effective configuration and the served endpoints.
    fn display_server_info(&self) {
        info!("Storage root: {}", self.config.storage_root.display());
        info!(
            "Read mode: {:?} (buffer {} bytes, max request {} bytes)",
            self.config.read_mode, self.config.read_buffer_size, self.config.max_request_size
        );
        info!("Registered endpoints:");
        for endpoint in ["GET /", "GET /echo/{text}", "GET /user-agent", "GET /file/{name}", "POST /file/{name}"] {
            info!("  {endpoint}");
        }
    }

    /// Bind the TCP listener.
    pub async fn bind(self) -> Result<BoundServer, Error> {
        self.config.validate()?;
        self.display_server_info();
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);
        Ok(BoundServer {
            listener,
            config: Arc::new(self.config),
            router: self.router,
        })
    }

    /// Bind, then serve until Ctrl+C.
    pub async fn start(self) -> Result<(), Error> {
        let bound = self.bind().await?;

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });

        bound
            .serve_until(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
    }

    /// Collect the bytes of one request from `socket`.
    ///
    /// In [`ReadMode::Single`] this is exactly one receive. In
    /// [`ReadMode::Accumulate`] reads continue until the request is complete, the
    /// peer closes, or `max_request_size` is reached; the result is capped there.
    /// An empty result means the peer closed without sending anything.
    pub async fn read_request(
        socket: &mut (impl AsyncRead + Unpin),
        config: &ServerConfig,
    ) -> io::Result<Vec<u8>> {
        let mut chunk = vec![0; config.read_buffer_size];

        match config.read_mode {
            ReadMode::Single => {
                let n = socket.read(&mut chunk).await?;
                chunk.truncate(n);
                Ok(chunk)
            }
            ReadMode::Accumulate => {
                let mut buf = Vec::new();
                let mut scanner = framing::FrameScanner::new();
                loop {
                    let n = socket.read(&mut chunk).await?;
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);

                    if buf.len() >= config.max_request_size {
                        warn!("Request reached the {} byte limit, truncating", config.max_request_size);
                        buf.truncate(config.max_request_size);
                        break;
                    }
                    if scanner.is_complete(&buf) {
                        break;
                    }
                }
                Ok(buf)
            }
        }
    }

    /// Handle a single connection: read one request, answer it, close.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        peer: SocketAddr,
        router: &Router,
        config: &ServerConfig,
    ) -> Result<(), Error> {
        let raw = match config.read_timeout() {
            Some(limit) => tokio::time::timeout(limit, Self::read_request(&mut *socket, config))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "timed out reading request"))??,
            None => Self::read_request(&mut *socket, config).await?,
        };
        if raw.is_empty() {
            return Ok(()); // Connection closed
        }
        info!("Read {} bytes from {peer}", raw.len());

        let request = match parse_request(&raw) {
            Ok(req) => req,
            Err(e) => {
                let response = HttpResponse::new(StatusCode::BadRequest);
                socket.write_all(&response.to_bytes()).await?;
                socket.shutdown().await?;
                info!(target: RESPONSE, "400 for unparseable request");
                return Err(Error::ParseError(e));
            }
        };

        info!(target: REQUEST, "{} {}", request.method, request.target);
        if !request.body.is_empty() {
            info!("Request body: {} bytes", request.body.len());
        }

        let (response, outcome) = router.handle(&request);
        let status = response.status;

        socket.write_all(&write_response(response, &request)).await?;
        socket.shutdown().await?;

        info!(target: RESPONSE, "{} for {} ({outcome})", status.as_u16(), request.target);
        Ok(())
    }

    /// Spawn the task for a newly accepted connection.
    fn handle_new_connection(
        mut socket: TcpStream,
        addr: SocketAddr,
        router: Arc<Router>,
        config: Arc<ServerConfig>,
        tasks: &mut JoinSet<()>,
    ) {
        info!("New connection from {addr}");
        tasks.spawn(async move {
            if let Err(e) = Self::handle_connection(&mut socket, addr, &router, &config).await {
                error!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        // Wait for all tasks to complete (with timeout)
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        info!("Server shutdown complete");
    }
}

impl BoundServer {
    /// The address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` completes, then drain in-flight ones.
    pub async fn serve_until(self, shutdown: impl Future<Output = ()>) -> Result<(), Error> {
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            HttpServer::handle_new_connection(
                                socket,
                                addr,
                                self.router.clone(),
                                self.config.clone(),
                                &mut tasks,
                            );
                        }
                        Err(e) => {
                            // Accept failures are per-connection; back off briefly and keep going.
                            error!("Error accepting connection: {e}");
                            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                        }
                    }
                }

                // Reap finished connection tasks so the set does not grow without bound.
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }
            }
        }

        HttpServer::perform_shutdown(&mut tasks).await;

        Ok(())
    }
}
