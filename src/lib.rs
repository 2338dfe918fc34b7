//! Go module proxy served from a generic artifact storage backend.
//!
//! The crate maps the GOPROXY URL grammar (`.../@v/v*.info`, `.../@v/v*.mod`,
//! `.../@v/v*.zip`, `.../@v/list`, `.../@latest`) onto content downloads from
//! a [`storage::Storage`] backend, with fixed content-type headers per route
//! and an empty 404 for everything else.

pub mod config;
pub mod http;
pub mod logger;
pub mod proxy;
pub mod routing;
pub mod server;
pub mod storage;

pub use config::Config;
pub use proxy::ModuleProxy;
pub use storage::{FsStorage, MemStorage, Storage, StorageError};
