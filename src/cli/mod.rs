//! CLI module for Chirpy
//!
//! Provides command-line interface parsing for the chirpy-server binary.

use clap::Parser;
use std::path::PathBuf;

/// Chirpy - a small social-posting API server
#[derive(Parser, Debug)]
#[command(
    name = "chirpy-server",
    version,
    about = "Chirpy - social-posting API server",
    after_help = "EXAMPLES:\n    \
                  chirpy-server                       # Start with ./chirpy.toml\n    \
                  chirpy-server --config prod.toml    # Use a custom config file\n    \
                  JWT_SECRET=... chirpy-server -v     # Debug logging"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "chirpy.toml", env = "CHIRPY_CONFIG")]
    pub config: PathBuf,

    /// Enable verbose (debug) logging, overriding `server.log_level`
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log filter directive for the tracing subscriber.
    pub fn log_filter(&self, configured: &str) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            configured.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["chirpy-server"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("chirpy.toml"));
        assert!(!cli.verbose);
        assert_eq!(cli.log_filter("info"), "info");
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["chirpy-server", "-c", "prod.toml", "--verbose"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("prod.toml"));
        assert_eq!(cli.log_filter("warn"), "debug");
    }
}
