use reelbox_api::setup;
use reelbox_core::Config;

// Use mimalloc as the global allocator for lower fragmentation with large upload buffers,
// especially on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Initialize the application (metadata store, storage client, routes)
    let (state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router, state.shutdown.clone()).await?;

    Ok(())
}
