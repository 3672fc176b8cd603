//! Transport configuration
//!
//! Describes which connection to build, e.g. from a JSON settings blob:
//!
//! ```
//! use print_label::TransportConfig;
//!
//! let config = TransportConfig::from_json(r#"{"type": "tcp", "host": "10.0.0.7"}"#)?;
//! assert_eq!(config, TransportConfig::Tcp { host: "10.0.0.7".into(), port: 9100, timeout_ms: None });
//! # Ok::<(), print_label::PrintError>(())
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::connection::{
    Connection, DEFAULT_PORT, FileConnection, StreamConnection, TcpConnection,
};
use crate::error::{PrintError, PrintResult};

/// Transport selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Text to the process stdout
    #[default]
    Stdout,
    /// Raw bytes to a filesystem path
    File {
        path: PathBuf,
        #[serde(default)]
        append: bool,
    },
    /// Raw bytes over TCP/IP
    Tcp {
        host: String,
        #[serde(default = "default_port")]
        port: u16,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl TransportConfig {
    /// Parse a JSON transport description
    pub fn from_json(json: &str) -> PrintResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PrintError::InvalidConfig(format!("Invalid transport config: {}", e)))
    }

    /// TCP transport from an address string such as "printer.local:9100"
    pub fn parse_addr(addr: &str) -> PrintResult<Self> {
        let (host, port) = crate::connection::split_host_port(addr)?;
        Ok(TransportConfig::Tcp {
            host,
            port,
            timeout_ms: None,
        })
    }

    /// Build a closed connection for this transport
    pub fn build(&self) -> PrintResult<Box<dyn Connection>> {
        match self {
            TransportConfig::Stdout => Ok(Box::new(StreamConnection::stdout())),
            TransportConfig::File { path, append } => {
                if path.as_os_str().is_empty() {
                    return Err(PrintError::InvalidConfig("Empty file path".to_string()));
                }
                Ok(Box::new(FileConnection::new(path).with_append(*append)))
            }
            TransportConfig::Tcp {
                host,
                port,
                timeout_ms,
            } => {
                if host.trim().is_empty() {
                    return Err(PrintError::InvalidConfig("Empty host".to_string()));
                }
                let mut conn = TcpConnection::new(host.trim(), *port);
                match timeout_ms {
                    Some(0) => {
                        return Err(PrintError::InvalidConfig(
                            "Connect timeout must be non-zero".to_string(),
                        ));
                    }
                    Some(ms) => conn = conn.with_timeout(Duration::from_millis(*ms)),
                    None => {}
                }
                Ok(Box::new(conn))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stdout() {
        let config = TransportConfig::from_json(r#"{"type": "stdout"}"#).unwrap();
        assert_eq!(config, TransportConfig::Stdout);
        assert_eq!(TransportConfig::default(), TransportConfig::Stdout);
    }

    #[test]
    fn test_parse_file() {
        let config =
            TransportConfig::from_json(r#"{"type": "file", "path": "/dev/usb/lp0"}"#).unwrap();
        assert_eq!(
            config,
            TransportConfig::File {
                path: PathBuf::from("/dev/usb/lp0"),
                append: false
            }
        );
    }

    #[test]
    fn test_parse_tcp_with_timeout() {
        let config = TransportConfig::from_json(
            r#"{"type": "tcp", "host": "::1", "port": 9101, "timeout_ms": 250}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            TransportConfig::Tcp {
                host: "::1".into(),
                port: 9101,
                timeout_ms: Some(250)
            }
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = TransportConfig::from_json(r#"{"type": "usb"}"#).unwrap_err();
        assert!(matches!(err, PrintError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_addr() {
        assert_eq!(
            TransportConfig::parse_addr("[::1]:9200").unwrap(),
            TransportConfig::Tcp {
                host: "::1".into(),
                port: 9200,
                timeout_ms: None
            }
        );
        assert!(TransportConfig::parse_addr("host:99999").is_err());
    }

    #[test]
    fn test_build_closed_connections() {
        let conn = TransportConfig::Stdout.build().unwrap();
        assert!(!conn.is_open());

        let conn = TransportConfig::parse_addr("127.0.0.1:9100")
            .unwrap()
            .build()
            .unwrap();
        assert!(!conn.is_open());
    }

    #[test]
    fn test_build_rejects_invalid() {
        let empty_host = TransportConfig::Tcp {
            host: " ".into(),
            port: 9100,
            timeout_ms: None,
        };
        assert!(matches!(empty_host.build(), Err(PrintError::InvalidConfig(_))));

        let zero_timeout = TransportConfig::Tcp {
            host: "printer".into(),
            port: 9100,
            timeout_ms: Some(0),
        };
        assert!(matches!(zero_timeout.build(), Err(PrintError::InvalidConfig(_))));

        let empty_path = TransportConfig::File {
            path: PathBuf::new(),
            append: false,
        };
        assert!(matches!(empty_path.build(), Err(PrintError::InvalidConfig(_))));
    }
}
