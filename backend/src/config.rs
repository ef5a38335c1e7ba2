use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use url::Url;

/// Development server for the board: serves the built bundle and forwards
/// control plane traffic.
#[derive(Debug, Clone, Parser)]
#[command(name = "umami-server", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "UMAMI_BIND", default_value = "127.0.0.1:3001")]
    pub bind: SocketAddr,

    /// Base URL of the control plane.
    #[arg(long, env = "UMAMI_UPSTREAM", default_value = "http://localhost:9808")]
    pub upstream: Url,

    /// Directory holding the built frontend (index.html and the wasm bundle).
    #[arg(long, env = "UMAMI_DIST_DIR", default_value = "frontend/dist")]
    pub dist_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "umami-server",
            "--bind",
            "0.0.0.0:8080",
            "--upstream",
            "http://control:9000",
            "--dist-dir",
            "/srv/board",
        ])
        .unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.upstream.as_str(), "http://control:9000/");
        assert_eq!(config.dist_dir, PathBuf::from("/srv/board"));
    }

    #[test]
    fn rejects_malformed_upstream() {
        assert!(Config::try_parse_from(["umami-server", "--upstream", "not a url"]).is_err());
    }
}
