use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default cap on request bodies, which bounds uploads.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default cap on the bytes all uploads may hold in memory together.
pub const DEFAULT_UPLOAD_STORE_BYTES: usize = 256 * 1024 * 1024;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory for template JSON files; `None` keeps templates in memory.
    pub data_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// Uploads live in memory for the life of the process; once they hold
    /// this many bytes further uploads are refused.
    pub upload_store_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3030,
            data_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_store_bytes: DEFAULT_UPLOAD_STORE_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default     |
    /// |-------------------------------|-------------|
    /// | `FORMDESK_HOST`               | `0.0.0.0`   |
    /// | `FORMDESK_PORT`               | `3030`      |
    /// | `FORMDESK_DATA_DIR`           | (in memory) |
    /// | `FORMDESK_MAX_UPLOAD_BYTES`   | `10485760`  |
    /// | `FORMDESK_UPLOAD_STORE_BYTES` | `268435456` |
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            host: parse_or(var("FORMDESK_HOST"), "FORMDESK_HOST", defaults.host),
            port: parse_or(var("FORMDESK_PORT"), "FORMDESK_PORT", defaults.port),
            data_dir: var("FORMDESK_DATA_DIR").map(PathBuf::from),
            max_upload_bytes: parse_or(
                var("FORMDESK_MAX_UPLOAD_BYTES"),
                "FORMDESK_MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            ),
            upload_store_bytes: parse_or(
                var("FORMDESK_UPLOAD_STORE_BYTES"),
                "FORMDESK_UPLOAD_STORE_BYTES",
                defaults.upload_store_bytes,
            ),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, name: &str, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {name}={raw}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr().to_string(), "0.0.0.0:3030");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("FORMDESK_HOST", "127.0.0.1"),
            ("FORMDESK_PORT", "8080"),
            ("FORMDESK_DATA_DIR", "/var/lib/formdesk"),
            ("FORMDESK_MAX_UPLOAD_BYTES", "1024"),
            ("FORMDESK_UPLOAD_STORE_BYTES", "4096"),
        ]);
        assert_eq!(config.addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/formdesk")));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.upload_store_bytes, 4096);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[("FORMDESK_PORT", "http"), ("FORMDESK_DATA_DIR", "  ")]);
        assert_eq!(config.port, 3030);
        assert_eq!(config.data_dir, None);
    }
}
