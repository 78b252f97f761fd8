use axum::Router;
use rcgen::{generate_simple_self_signed, CertifiedKey};
use sidecar_injector::{
    config::{Config, TlsConfig},
    template::{default_template, MutationTemplate},
    SidecarInjector,
};
use std::net::SocketAddr;

pub(crate) fn default_test_config(tls_config: TlsConfig) -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 8443)),
        tls_config,
        mutation_template: default_template(),
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) async fn app(mutation_template: MutationTemplate) -> Router {
    // Starting from rustls 0.22, each application must set its default crypto provider.
    // This is done by `main`, which is not run by the tests.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let certs_dir = tempfile::tempdir().unwrap();
    let cert_file = certs_dir.path().join("tls.crt");
    let key_file = certs_dir.path().join("tls.key");

    let CertifiedKey { cert, key_pair } =
        generate_simple_self_signed(vec!["sidecar-injector.default.svc".to_string()]).unwrap();
    std::fs::write(&cert_file, cert.pem()).unwrap();
    std::fs::write(&key_file, key_pair.serialize_pem()).unwrap();

    let mut config = default_test_config(TlsConfig {
        cert_file,
        key_file,
    });
    config.mutation_template = mutation_template;

    let server = SidecarInjector::new_from_config(config).await.unwrap();

    server.router()
}
