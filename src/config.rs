use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mock-bmc",
    about = "Mock BMC Redfish server",
    version = crate::version::VERSION,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[arg(
        long = "http-bind",
        env = "MOCK_BMC_HTTP_BIND",
        value_name = "ADDR",
        default_value = "0.0.0.0:8000"
    )]
    pub http_bind: SocketAddr,

    #[arg(
        long = "https-bind",
        env = "MOCK_BMC_HTTPS_BIND",
        value_name = "ADDR",
        default_value = "0.0.0.0:8443"
    )]
    pub https_bind: SocketAddr,

    /// Directory holding the TLS certificate and key; a self-signed pair is
    /// generated there on first start.
    #[arg(
        long = "cert-dir",
        env = "MOCK_BMC_CERT_DIR",
        value_name = "PATH",
        default_value = "/tmp/certs"
    )]
    pub cert_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_flags_absent() {
        let cli = Cli::try_parse_from(["mock-bmc"]).unwrap();
        assert_eq!(cli.config.http_bind, "0.0.0.0:8000".parse().unwrap());
        assert_eq!(cli.config.https_bind, "0.0.0.0:8443".parse().unwrap());
        assert_eq!(cli.config.cert_dir, PathBuf::from("/tmp/certs"));
    }

    #[test]
    fn parses_explicit_bind_addresses() {
        let cli = Cli::try_parse_from([
            "mock-bmc",
            "--http-bind",
            "127.0.0.1:9000",
            "--https-bind",
            "127.0.0.1:9443",
            "--cert-dir",
            "/var/lib/mock-bmc/certs",
        ])
        .unwrap();
        assert_eq!(cli.config.http_bind, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cli.config.https_bind, "127.0.0.1:9443".parse().unwrap());
        assert_eq!(cli.config.cert_dir, PathBuf::from("/var/lib/mock-bmc/certs"));
    }

    #[test]
    fn rejects_invalid_bind_address() {
        let err = Cli::try_parse_from(["mock-bmc", "--http-bind", "not-an-addr"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("--http-bind"));
    }
}
