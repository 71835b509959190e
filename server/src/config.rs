//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", about = "HTTP service for a SQLite-backed to-do list")]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// SQLite database file; `:memory:` keeps everything in memory.
    #[arg(long, env = "TODO_DATABASE", default_value = "todoApplication.db")]
    pub database: PathBuf,
}

impl Config {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_set_every_field() {
        let config = Config::try_parse_from([
            "todo-server",
            "--host",
            "0.0.0.0",
            "--port",
            "9001",
            "--database",
            ":memory:",
        ])
        .unwrap();
        assert_eq!(config.address(), "0.0.0.0:9001");
        assert_eq!(config.database, PathBuf::from(":memory:"));
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Config::try_parse_from(["todo-server", "--port", "eighty"]).is_err());
    }
}
