//! Runtime configuration from command-line flags and environment

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use event_auth::token::DEFAULT_TOKEN_TTL;

/// Command-line arguments for the events API server
///
/// Every flag can also be supplied through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "events-api")]
#[command(about = "REST API for creating, browsing and registering for events")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// SQLite connection string; defaults to a file in the user data directory
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Size of the database connection pool
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value = "5")]
    pub max_connections: u32,

    /// Secret used to sign bearer tokens (at least 32 bytes)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = DEFAULT_TOKEN_TTL)]
    pub token_ttl_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(default_database_url)
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

fn default_database_url() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("events-api");
    std::fs::create_dir_all(&data_dir).ok();
    format!("sqlite:{}/events.db?mode=rwc", data_dir.display())
}

/// Platform-specific data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "config-test-secret-at-least-32-bytes";

    #[test]
    fn explicit_flags_are_used() {
        let config = Config::try_parse_from([
            "events-api",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--database-url",
            "sqlite::memory:",
            "--jwt-secret",
            SECRET,
            "--token-ttl-secs",
            "60",
        ])
        .unwrap();

        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:9090");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.token_ttl_secs, 60);
    }

    #[test]
    fn bad_host_is_reported() {
        let config = Config::try_parse_from([
            "events-api",
            "--host",
            "not a host",
            "--jwt-secret",
            SECRET,
        ])
        .unwrap();

        assert!(config.bind_addr().is_err());
    }
}
