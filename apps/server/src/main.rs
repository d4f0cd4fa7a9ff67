use anyhow::Context;
use trailhub_kernel::config::{AppConfig, load_config};
use trailhub_logger::Logger;
use trailhub_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).init()?;

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "server".to_owned());
    let cfg: AppConfig =
        load_config(Some(&config_path)).context("Critical: Configuration is malformed")?;

    Server::builder().config(cfg).build().await?.run().await
}
