use anyhow::{anyhow, Result};
use clap::ArgMatches;
use lazy_static::lazy_static;
use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::template::{default_template, MutationTemplate};

pub static SERVICE_NAME: &str = "sidecar-injector";

lazy_static! {
    pub(crate) static ref HOSTNAME: String =
        std::env::var("HOSTNAME").unwrap_or_else(|_| String::from("unknown"));
}

pub struct Config {
    pub addr: SocketAddr,
    pub tls_config: TlsConfig,
    pub mutation_template: MutationTemplate,
    pub log_level: String,
    pub log_fmt: String,
    pub log_no_color: bool,
}

#[derive(Clone, Debug)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

impl Config {
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        let addr = api_bind_address(matches)?;
        let tls_config = tls_config(matches);
        let mutation_template = mutation_template(matches)?;

        let log_level = matches
            .get_one::<String>("log-level")
            .expect("This should not happen, there's a default value for log-level")
            .to_owned();
        let log_fmt = matches
            .get_one::<String>("log-fmt")
            .expect("This should not happen, there's a default value for log-fmt")
            .to_owned();
        let log_no_color = matches
            .get_one::<bool>("log-no-color")
            .expect("clap should have assigned a default value")
            .to_owned();

        Ok(Self {
            addr,
            tls_config,
            mutation_template,
            log_level,
            log_fmt,
            log_no_color,
        })
    }
}

fn api_bind_address(matches: &ArgMatches) -> Result<SocketAddr> {
    let address = matches
        .get_one::<String>("address")
        .expect("This should not happen, there's a default value for address");
    let port = matches
        .get_one::<String>("port")
        .expect("This should not happen, there's a default value for port");

    format!("{address}:{port}")
        .parse()
        .map_err(|e| anyhow!("error parsing arguments: {}", e))
}

fn tls_config(matches: &ArgMatches) -> TlsConfig {
    let cert_file = matches
        .get_one::<String>("cert-file")
        .map(PathBuf::from)
        .expect("This should not happen, there's a default value for cert-file");
    let key_file = matches
        .get_one::<String>("key-file")
        .map(PathBuf::from)
        .expect("This should not happen, there's a default value for key-file");

    TlsConfig {
        cert_file,
        key_file,
    }
}

fn mutation_template(matches: &ArgMatches) -> Result<MutationTemplate> {
    match matches.get_one::<String>("sidecar-config") {
        None => Ok(default_template()),
        Some(path) => {
            let path = Path::new(path);
            read_sidecar_config_file(path).map_err(|e| {
                anyhow!(
                    "error while loading sidecar configuration from {:?}: {}",
                    path,
                    e
                )
            })
        }
    }
}

/// Reads the sidecar configuration file, a YAML document with a `containers`
/// list. The containers are injected in the order they are listed.
fn read_sidecar_config_file(path: &Path) -> Result<MutationTemplate> {
    let file = File::open(path)?;
    let template: MutationTemplate = serde_yaml::from_reader(&file)?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults() {
        let matches = cli::build_cli()
            .try_get_matches_from(["sidecar-injector"])
            .unwrap();

        let config = Config::from_args(&matches).unwrap();

        assert_eq!(config.addr, "0.0.0.0:8443".parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.tls_config.cert_file,
            PathBuf::from("/etc/webhook/certs/tls.crt")
        );
        assert_eq!(
            config.tls_config.key_file,
            PathBuf::from("/etc/webhook/certs/tls.key")
        );
        assert_eq!(config.mutation_template, default_template());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_fmt, "text");
    }

    #[test]
    fn sidecar_config_file() {
        let sidecar_yaml = r#"
---
containers:
  - name: logger
    image: busybox
    command: ["tail", "-f", "/dev/null"]
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(sidecar_yaml.as_bytes()).unwrap();
        let file_path = temp_file.into_temp_path();
        let sidecar_flag = format!("--sidecar-config={}", file_path.to_str().unwrap());

        let matches = cli::build_cli()
            .try_get_matches_from(["sidecar-injector", &sidecar_flag])
            .unwrap();
        let config = Config::from_args(&matches).unwrap();

        let containers = config.mutation_template.containers();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name, "logger");
        assert_eq!(containers[0].image.as_deref(), Some("busybox"));
    }

    #[test]
    fn missing_sidecar_config_file() {
        let matches = cli::build_cli()
            .try_get_matches_from([
                "sidecar-injector",
                "--sidecar-config=/does/not/exist.yaml",
            ])
            .unwrap();

        let err = Config::from_args(&matches).err().unwrap();

        assert!(err
            .to_string()
            .contains("error while loading sidecar configuration"));
    }

    #[test]
    fn invalid_bind_address() {
        let matches = cli::build_cli()
            .try_get_matches_from(["sidecar-injector", "--port=not-a-port"])
            .unwrap();

        assert!(Config::from_args(&matches).is_err());
    }

    #[test]
    fn log_no_color_flag() {
        let matches = cli::build_cli()
            .try_get_matches_from(["sidecar-injector", "--log-no-color"])
            .unwrap();

        let config = Config::from_args(&matches).unwrap();
        assert!(config.log_no_color);
    }

    #[test]
    fn unknown_log_format_is_refused() {
        let result = cli::build_cli().try_get_matches_from(["sidecar-injector", "--log-fmt=xml"]);
        assert!(result.is_err());
    }
}
