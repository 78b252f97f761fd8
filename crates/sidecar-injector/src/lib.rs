pub mod admission_review;
mod api;
mod certs;
pub mod cli;
pub mod config;
pub mod errors;
pub mod patch;
pub mod response;
pub mod target;
pub mod template;
pub mod tracing;

#[cfg(test)]
mod test_utils;

use ::tracing::info;
use anyhow::{anyhow, Result};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::{net::SocketAddr, sync::Arc};

use config::Config;
use template::{StaticTemplateSource, TemplateSource};

pub struct SidecarInjector {
    router: Router,
    addr: SocketAddr,
    tls_config: RustlsConfig,
}

impl SidecarInjector {
    /// Build the webhook out of its configuration. The mutation template and
    /// the TLS material are loaded here, once, and never change afterwards.
    pub async fn new_from_config(config: Config) -> Result<Self> {
        let template_source: Arc<dyn TemplateSource> =
            Arc::new(StaticTemplateSource::new(config.mutation_template));
        let tls_config = certs::create_tls_config(&config.tls_config).await?;

        Ok(Self {
            router: api::router(template_source),
            addr: config.addr,
            tls_config,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(self) -> Result<()> {
        info!(address = self.addr.to_string().as_str(), "started HTTPS server");

        axum_server::bind_rustls(self.addr, self.tls_config)
            .serve(self.router.into_make_service())
            .await
            .map_err(|e| anyhow!("HTTPS server error: {e}"))
    }
}
