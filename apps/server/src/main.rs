use anyhow::Context;
use skc::domain::config::ApiConfig;
use skc::kernel::config::load_config;
use skc_server::{Server, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1);
    let cfg: ApiConfig = load_config(path).context("Critical: Configuration is malformed")?;

    let _log = init_logger(env!("CARGO_PKG_NAME"), &cfg.log)?;

    Server::builder().config(cfg).build().await?.run().await
}
