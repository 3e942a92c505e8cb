//! Server configuration: bind address and store location.
//!
//! Each setting comes from a command-line flag, then its environment
//! variable, then the built-in default.

use std::path::PathBuf;
use crate::{Error, Result};

/// Environment variable holding the listen port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable holding the bind host.
pub const HOST_ENV: &str = "BOOKSHELF_HOST";
/// Environment variable holding the store file path.
pub const DB_ENV: &str = "BOOKSHELF_DB";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "db.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Store document, relative to the working directory.
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl ServerConfig {
    /// Builds the config from optional flag values, falling back to `lookup`
    /// for the environment and then to the defaults.
    ///
    /// A `PORT` value that is not a valid port number is an error.
    pub fn resolve<F>(
        port: Option<u16>,
        host: Option<String>,
        db_path: Option<PathBuf>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match port {
            Some(port) => port,
            None => match lookup(PORT_ENV) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    Error::Config(format!("{} is not a valid port: {:?}", PORT_ENV, raw))
                })?,
                None => DEFAULT_PORT,
            },
        };

        let host = host
            .or_else(|| lookup(HOST_ENV))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let db_path = db_path
            .or_else(|| lookup(DB_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        Ok(Self { host, port, db_path })
    }

    /// Like [`ServerConfig::resolve`], reading the process environment.
    pub fn from_env(port: Option<u16>, host: Option<String>, db_path: Option<PathBuf>) -> Result<Self> {
        Self::resolve(port, host, db_path, |key| std::env::var(key).ok())
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL advertised in the API description.
    pub fn public_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}
