// Server module entry point
// Listener construction and the accept loop

pub mod connection;
pub mod listener;

pub use connection::{accept_connection, ServerContext};
pub use listener::create_reusable_listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::logger;

/// Run the accept loop until the process is terminated
pub async fn run(listener: TcpListener, ctx: Arc<ServerContext>) {
    let conn_counter = Arc::new(AtomicUsize::new(0));
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::accept_connection(stream, peer_addr, &ctx, &conn_counter);
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
