//! Process configuration
//!
//! Every option can come from the command line, the environment, or a `.env`
//! file loaded before parsing.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use shared::{DEFAULT_GROUPS, GroupSet};

use crate::error::{ServerError, ServerResult};

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "experiment-server")]
#[command(about = "Balances participants across experimental groups and stores their final data")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "EXPERIMENT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for HTTP and WebSocket connections
    #[arg(long, env = "EXPERIMENT_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory receiving one JSON file per participant
    #[arg(long, env = "EXPERIMENT_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Directory holding the experiment UI, served for non-API paths
    #[arg(long, env = "EXPERIMENT_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Comma-separated experimental groups
    #[arg(long, env = "EXPERIMENT_GROUPS", default_value_t = DEFAULT_GROUPS.join(","))]
    pub groups: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "EXPERIMENT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Validated configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub data_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub groups: GroupSet,
    pub log_level: String,
}

impl Args {
    pub fn into_config(self) -> ServerResult<ServerConfig> {
        let host: IpAddr = self
            .host
            .parse()
            .map_err(|e| ServerError::config(format!("Invalid host '{}': {}", self.host, e)))?;

        let groups = GroupSet::parse(&self.groups)?;

        Ok(ServerConfig {
            bind_address: SocketAddr::new(host, self.port),
            data_dir: self.data_dir,
            static_dir: self.static_dir,
            groups,
            log_level: self.log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["experiment-server"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_arguments() {
        let config = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--data-dir",
            "/tmp/results",
            "--static-dir",
            "./public",
            "--groups",
            "Control,Music",
            "--log-level",
            "debug",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/results"));
        assert_eq!(config.static_dir, Some(PathBuf::from("./public")));
        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_host_is_config_error() {
        let result = parse(&["--host", "not-an-ip"]).into_config();
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn test_invalid_groups_are_rejected() {
        let result = parse(&["--groups", "Control,Control"]).into_config();
        assert!(matches!(result, Err(ServerError::Shared(_))));
    }
}
