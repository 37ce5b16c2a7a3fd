//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

/// Error type for TLS setup.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("{kind} file not found: {path:?}")]
    NotFound { kind: &'static str, path: PathBuf },

    #[error("failed to read {kind} file: {source}")]
    Read {
        kind: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in {0:?}")]
    NoCertificates(PathBuf),

    #[error("no private key found in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("invalid certificate or key: {0}")]
    Rustls(#[from] tokio_rustls::rustls::Error),
}

/// Build a TLS acceptor from PEM certificate chain and private key files.
pub fn load_tls_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor, TlsError> {
    let mut cert_reader = open("certificate", cert_path)?;
    let certs = rustls_pemfile::certs(&mut cert_reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Read {
            kind: "certificate",
            source,
        })?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificates(cert_path.to_path_buf()));
    }

    let mut key_reader = open("private key", key_path)?;
    let key = rustls_pemfile::private_key(&mut key_reader)
        .map_err(|source| TlsError::Read {
            kind: "private key",
            source,
        })?
        .ok_or_else(|| TlsError::NoPrivateKey(key_path.to_path_buf()))?;

    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn open(kind: &'static str, path: &Path) -> Result<BufReader<File>, TlsError> {
    if !path.exists() {
        return Err(TlsError::NotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| TlsError::Read { kind, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_certificate() {
        let err = load_tls_acceptor(Path::new("/nope/cert.crt"), Path::new("/nope/key.key"))
            .err()
            .unwrap();
        assert!(matches!(err, TlsError::NotFound { kind: "certificate", .. }));
    }

    #[test]
    fn empty_pem_has_no_certificates() {
        let path = std::env::temp_dir().join(format!("mock-echo-empty-{}.crt", std::process::id()));
        File::create(&path).unwrap().write_all(b"not a pem\n").unwrap();

        let err = load_tls_acceptor(&path, &path).err().unwrap();
        assert!(matches!(err, TlsError::NoCertificates(_)));
        let _ = std::fs::remove_file(path);
    }
}
