use fanout_core::Config;

// Use mimalloc as the global allocator; image buffers churn through the heap on every
// upload.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, pipeline, routes)
    let (_state, router) = fanout_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    fanout_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
