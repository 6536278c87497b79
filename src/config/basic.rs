use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`. Default: `8188`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Path the image handler is mounted on.
    /// TOML: `basic.route_path`. Default: `/generate-image`.
    #[serde(default = "default_route_path")]
    pub route_path: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            loglevel: default_loglevel(),
            route_path: default_route_path(),
        }
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    8188
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_route_path() -> String {
    "/generate-image".to_string()
}
