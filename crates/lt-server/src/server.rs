//! HTTP server lifecycle.
//!
//! Runs a lightweight accept loop on a background thread. The loop polls
//! a shutdown flag between requests, so `shutdown()` (or dropping the
//! handle) stops the server promptly without killing in-flight work.
//! No timeout is applied around the outbound backend call; generation
//! requests may legitimately block for minutes.

use crate::error::ServerError;
use crate::router::App;
use lt_config::Config;
use lt_store::ArtifactStore;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info};

/// Handle to the running reporter HTTP server.
pub struct ReporterServer {
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
    addr: SocketAddr,
}

impl ReporterServer {
    /// Validate configuration, prepare the artifact roots and start the
    /// accept loop on a background thread.
    pub fn start(config: Config) -> Result<Self, ServerError> {
        config.validate()?;
        let addr = config.listen_addr()?;

        let store = ArtifactStore::new(&config.ingest_root);
        store.ensure_roots()?;

        let server = tiny_http::Server::http(addr).map_err(|err| ServerError::Bind {
            addr: addr.to_string(),
            reason: err.to_string(),
        })?;
        let bound = server.server_addr().to_ip().unwrap_or(addr);

        info!(
            addr = %bound,
            ingest_root = %config.ingest_root.display(),
            public_dir = %config.public_dir.display(),
            backend = %config.backend_url,
            model = %config.model,
            "reporter server started"
        );

        let app = App::new(config);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();

        let thread = thread::Builder::new()
            .name("lt-http".to_string())
            .spawn(move || serve_loop(server, &app, &shutdown_flag))?;

        Ok(ReporterServer {
            shutdown,
            thread: Some(thread),
            addr: bound,
        })
    }

    /// The bound listen address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the serve loop exits.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    /// Stop accepting requests and wait for the loop to finish.
    pub fn shutdown(mut self) {
        self.stop();
        info!("reporter server stopped");
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Unblock the accept loop in case it is waiting
        let _ = std::net::TcpStream::connect(self.addr);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ReporterServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Accept loop: dispatch GET requests through the router.
fn serve_loop(server: tiny_http::Server, app: &App, shutdown: &AtomicBool) {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        // Accept with timeout so the shutdown flag is observed
        let request = match server.recv_timeout(Duration::from_secs(1)) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(err) => {
                if !shutdown.load(Ordering::SeqCst) {
                    error!(error = %err, "server accept error");
                }
                break;
            }
        };

        if shutdown.load(Ordering::SeqCst) {
            let _ = request
                .respond(tiny_http::Response::from_string("shutting down").with_status_code(503));
            break;
        }

        let method = request.method().clone();
        let url = request.url().to_string();

        let reply = if method == tiny_http::Method::Get {
            app.handle(&url)
        } else {
            crate::router::HttpReply {
                status: 405,
                content_type: "text/plain",
                body: b"method not allowed".to_vec(),
            }
        };

        info!(method = %method, url = %url, status = reply.status, "request served");

        let response = tiny_http::Response::from_data(reply.body)
            .with_status_code(reply.status)
            .with_header(
                format!("Content-Type: {}", reply.content_type)
                    .parse::<tiny_http::Header>()
                    .unwrap(),
            );
        if let Err(err) = request.respond(response) {
            error!(error = %err, "failed to send response");
        }
    }
}
