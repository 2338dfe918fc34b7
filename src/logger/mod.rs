//! Logger module
//!
//! Best-effort logging for the proxy:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support
//!
//! Writes never fail a request; a dropped log line is acceptable, a failed
//! response is not.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use hyper::{Method, Uri, Version};

use crate::config::Config;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        config.logging.access_log,
        &config.logging.access_log_format,
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Whether access logging is active (false until `init` runs)
fn access_log_enabled() -> bool {
    writer::is_initialized() && writer::get().access_enabled()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Go module proxy started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Storage root: {}", config.storage.root));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Using Tokio runtime for concurrency");
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log an incoming request line before it is dispatched
pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    if access_log_enabled() {
        writer::get().write_access(&format!("[Request] {method} {uri} {version:?}"));
    }
}

/// Log a completed request in the configured access-log format
pub fn log_access(entry: &AccessLogEntry) {
    if access_log_enabled() {
        let writer = writer::get();
        let line = entry.format(writer.access_format());
        writer.write_access(&line);
    }
}
