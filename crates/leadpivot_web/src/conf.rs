//! Server-level settings; the pivot itself takes no runtime configuration.

use std::net::SocketAddr;

use clap::Parser;

/// Default listen address.
pub const C_BIND_DEFAULT: &str = "127.0.0.1:8501";
/// Default upload size cap (200 MiB).
pub const N_MAX_UPLOAD_BYTES_DEFAULT: usize = 200 * 1024 * 1024;

/// CSV to Excel lead status pivot, served as a single-page form.
#[derive(Debug, Clone, Parser)]
#[command(name = "leadpivot")]
#[command(about = "CSV to Excel converter: per-agent lead status pivot")]
#[command(version)]
pub struct ServerConfig {
    /// Listen address
    #[arg(long, env = "LEADPIVOT_BIND", default_value = C_BIND_DEFAULT)]
    pub bind: SocketAddr,

    /// Largest accepted upload in bytes
    #[arg(long, env = "LEADPIVOT_MAX_UPLOAD_BYTES", default_value_t = N_MAX_UPLOAD_BYTES_DEFAULT)]
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be >= 1.".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_and_validate() {
        let config = ServerConfig::try_parse_from(["leadpivot"]).expect("parse");
        assert_eq!(config.bind, C_BIND_DEFAULT.parse::<SocketAddr>().expect("addr"));
        assert_eq!(config.max_upload_bytes, N_MAX_UPLOAD_BYTES_DEFAULT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_upload_limit_is_rejected() {
        let config = ServerConfig::try_parse_from([
            "leadpivot",
            "--bind",
            "0.0.0.0:9000",
            "--max-upload-bytes",
            "0",
        ])
        .expect("parse");
        assert_eq!(config.bind.port(), 9000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_bind_address_fails_to_parse() {
        assert!(ServerConfig::try_parse_from(["leadpivot", "--bind", "nowhere"]).is_err());
    }
}
