use courier::config::Config;
use courier::server::listener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    tokio::select! {
        res = run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn run(cfg: &Config) -> anyhow::Result<()> {
    let file_service = async {
        match &cfg.server {
            Some(server_cfg) => listener::run_files(server_cfg).await,
            None => Ok(()),
        }
    };

    let proxy_service = async {
        match &cfg.proxy {
            Some(proxy_cfg) => listener::run_proxy(proxy_cfg).await,
            None => Ok(()),
        }
    };

    tokio::try_join!(file_service, proxy_service)?;
    Ok(())
}
