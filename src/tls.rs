use std::{
    fmt, fs, io,
    net::{IpAddr, Ipv4Addr},
    path::Path,
};

use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose, PKCS_ECDSA_P256_SHA256, SanType,
};
use time::OffsetDateTime;
use tracing::info;

pub const CERT_FILE: &str = "bmc.crt";
pub const KEY_FILE: &str = "bmc.key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCertPem {
    pub cert_pem: String,
    pub key_pem: String,
}

#[derive(Debug)]
pub enum TlsError {
    Rcgen(rcgen::Error),
    Io(io::Error),
    InvalidPem(&'static str),
    Rustls(rustls::Error),
}

impl fmt::Display for TlsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rcgen(_) => write!(f, "certificate generation failed"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::InvalidPem(what) => write!(f, "invalid pem material: {what}"),
            Self::Rustls(e) => write!(f, "tls config error: {e}"),
        }
    }
}

impl std::error::Error for TlsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rcgen(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::InvalidPem(_) => None,
            Self::Rustls(e) => Some(e),
        }
    }
}

impl From<rcgen::Error> for TlsError {
    fn from(value: rcgen::Error) -> Self {
        Self::Rcgen(value)
    }
}

impl From<io::Error> for TlsError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rustls::Error> for TlsError {
    fn from(value: rustls::Error) -> Self {
        Self::Rustls(value)
    }
}

/// Returns the PEM pair from `cert_dir`, generating and persisting a
/// self-signed one when either file is missing. Existing files are reused
/// untouched so the certificate stays stable across restarts.
pub fn load_or_generate(cert_dir: &Path) -> Result<ServerCertPem, TlsError> {
    let cert_path = cert_dir.join(CERT_FILE);
    let key_path = cert_dir.join(KEY_FILE);

    if cert_path.exists() && key_path.exists() {
        return Ok(ServerCertPem {
            cert_pem: fs::read_to_string(&cert_path)?,
            key_pem: fs::read_to_string(&key_path)?,
        });
    }

    info!(cert_dir = %cert_dir.display(), "generating self-signed TLS certificate");
    fs::create_dir_all(cert_dir)?;
    let generated = generate_server_cert()?;
    fs::write(&cert_path, generated.cert_pem.as_bytes())?;
    fs::write(&key_path, generated.key_pem.as_bytes())?;
    best_effort_chmod_0600(&key_path);

    Ok(generated)
}

pub fn generate_server_cert() -> Result<ServerCertPem, TlsError> {
    let mut params = server_cert_params()?;
    let now = OffsetDateTime::now_utc();
    params.not_before = now - time::Duration::days(1);
    params.not_after = now + time::Duration::days(365);

    let key = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256)?;
    let cert = params.self_signed(&key)?;

    Ok(ServerCertPem {
        cert_pem: cert.pem(),
        key_pem: key.serialize_pem(),
    })
}

fn server_cert_params() -> Result<CertificateParams, TlsError> {
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "mock-bmc");
    dn.push(DnType::OrganizationName, "MockVendor");
    params.distinguished_name = dn;
    params.subject_alt_names = vec![
        SanType::DnsName("mock-bmc".try_into()?),
        SanType::DnsName("localhost".try_into()?),
        SanType::IpAddress(IpAddr::V4(Ipv4Addr::LOCALHOST)),
    ];
    params.is_ca = IsCa::NoCa;
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    Ok(params)
}

/// Builds the rustls server config from in-memory PEM material.
pub fn build_rustls_config(pem: &ServerCertPem) -> Result<rustls::ServerConfig, TlsError> {
    let certs = rustls_pemfile::certs(&mut pem.cert_pem.as_bytes())
        .collect::<Result<Vec<_>, _>>()?;
    if certs.is_empty() {
        return Err(TlsError::InvalidPem("no certificate found"));
    }
    let key = rustls_pemfile::private_key(&mut pem.key_pem.as_bytes())?
        .ok_or(TlsError::InvalidPem("no private key found"))?;

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    Ok(config)
}

fn best_effort_chmod_0600(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
}
