use std::sync::Arc;

use gomod_proxy::config::Config;
use gomod_proxy::proxy::ModuleProxy;
use gomod_proxy::server::{self, ServerContext};
use gomod_proxy::storage::{FsStorage, Storage};
use gomod_proxy::logger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, honoring the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(cfg.storage.root.clone()));
    let proxy = ModuleProxy::new(storage);

    logger::log_server_start(&addr, &cfg);

    let ctx = Arc::new(ServerContext { config: cfg, proxy });
    server::run(listener, ctx).await;

    Ok(())
}
