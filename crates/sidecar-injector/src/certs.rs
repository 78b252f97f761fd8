use std::{path::Path, sync::Arc};

use ::tracing::{info, warn};
use anyhow::{anyhow, Result};
use axum_server::tls_rustls::RustlsConfig;
use rustls::ServerConfig;
use rustls_pki_types::{pem::SliceIter, CertificateDer, PrivateKeyDer};

use crate::config::TlsConfig;

/// Load the server certificate and key and build the TLS configuration of
/// the HTTPS server. The files are read once, changes are not picked up.
pub(crate) async fn create_tls_config(tls_config: &TlsConfig) -> Result<RustlsConfig> {
    let (cert, key) = load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file).await?;
    let server_config = build_tls_server_config(cert, key)?;

    info!(
        cert_file = ?tls_config.cert_file,
        key_file = ?tls_config.key_file,
        "TLS certificate loaded"
    );

    Ok(RustlsConfig::from_config(Arc::new(server_config)))
}

fn build_tls_server_config(
    cert: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
) -> Result<ServerConfig> {
    Ok(ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert, key)?)
}

async fn load_server_cert_and_key(
    cert_file: &Path,
    key_file: &Path,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
    let cert_contents = tokio::fs::read(cert_file)
        .await
        .map_err(|e| anyhow!("Error opening certificate file {:?}: {e}", cert_file))?;
    let key_contents = tokio::fs::read(key_file)
        .await
        .map_err(|e| anyhow!("Error opening key file {:?}: {e}", key_file))?;

    let cert_iterator: SliceIter<CertificateDer> = SliceIter::new(&cert_contents[..]);
    let certs: Vec<_> = cert_iterator
        .filter_map(|it| {
            if let Err(ref e) = it {
                warn!("Cannot parse certificate: {e}");
            }
            it.ok()
        })
        .collect();

    if certs.len() != 1 {
        return Err(anyhow!(
            "Expected exactly one certificate in certificate file, found {}",
            certs.len()
        ));
    }

    let key_iterator: SliceIter<PrivateKeyDer> = SliceIter::new(&key_contents[..]);
    let mut keys: Vec<PrivateKeyDer> = key_iterator
        .filter_map(|it| {
            if let Err(ref e) = it {
                warn!("Cannot parse private key: {e}");
            }
            it.ok()
        })
        .collect();

    if keys.len() != 1 {
        return Err(anyhow!(
            "Expected exactly one key in key file, found {}",
            keys.len()
        ));
    }

    Ok((certs, keys.remove(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{generate_simple_self_signed, CertifiedKey};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_tls_files(dir: &TempDir, cert: &str, key: &str) -> TlsConfig {
        let cert_file = dir.path().join("tls.crt");
        let key_file = dir.path().join("tls.key");
        std::fs::write(&cert_file, cert).unwrap();
        std::fs::write(&key_file, key).unwrap();

        TlsConfig {
            cert_file,
            key_file,
        }
    }

    fn self_signed(hostname: &str) -> (String, String) {
        let CertifiedKey { cert, key_pair } =
            generate_simple_self_signed(vec![hostname.to_string()]).unwrap();
        (cert.pem(), key_pair.serialize_pem())
    }

    fn install_crypto_provider() {
        // fails when another test got there first, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    #[tokio::test]
    async fn load_valid_certificate() {
        install_crypto_provider();
        let dir = tempfile::tempdir().unwrap();
        let (cert, key) = self_signed("sidecar-injector.default.svc");
        let tls_config = write_tls_files(&dir, &cert, &key);

        assert!(create_tls_config(&tls_config).await.is_ok());
    }

    #[tokio::test]
    async fn missing_files_are_reported() {
        let tls_config = TlsConfig {
            cert_file: PathBuf::from("/does/not/exist/tls.crt"),
            key_file: PathBuf::from("/does/not/exist/tls.key"),
        };

        let err = create_tls_config(&tls_config).await.err().unwrap();
        assert!(err.to_string().contains("Error opening certificate file"));
    }

    #[tokio::test]
    async fn more_than_one_certificate_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let (cert1, key) = self_signed("one.example.com");
        let (cert2, _) = self_signed("two.example.com");
        let tls_config = write_tls_files(&dir, &format!("{cert1}{cert2}"), &key);

        let err = create_tls_config(&tls_config).await.err().unwrap();
        assert!(err
            .to_string()
            .contains("Expected exactly one certificate in certificate file, found 2"));
    }

    #[tokio::test]
    async fn key_file_without_key_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let (cert, _) = self_signed("sidecar-injector.default.svc");
        let tls_config = write_tls_files(&dir, &cert, &cert);

        let err = create_tls_config(&tls_config).await.err().unwrap();
        assert!(err
            .to_string()
            .contains("Expected exactly one key in key file, found 0"));
    }
}
