use bytesweep_core::Config;

// mimalloc as the global allocator; lower fragmentation under many concurrent uploads.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = bytesweep_api::setup::initialize_app(config.clone()).await?;

    bytesweep_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
