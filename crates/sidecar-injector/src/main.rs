use anyhow::{anyhow, Result};
use sidecar_injector::{
    cli,
    config::{Config, SERVICE_NAME},
    tracing::setup_tracing,
    SidecarInjector,
};
use std::process;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_args(&matches)?;

    setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color)?;
    debug!("tracing system ready");

    // Starting from rustls 0.22, each application must set its default crypto provider.
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install crypto provider"))?;

    info!(
        service = SERVICE_NAME,
        template_containers = config.mutation_template.containers().len(),
        "starting webhook server"
    );

    let server = match SidecarInjector::new_from_config(config).await {
        Ok(server) => server,
        Err(e) => fatal_error(e.to_string()),
    };

    if let Err(e) = server.run().await {
        fatal_error(e.to_string());
    }

    Ok(())
}

fn fatal_error(msg: String) -> ! {
    error!("{}", msg);
    process::exit(1);
}
