//! Command line arguments and resolved configuration

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_SITE_URL: &str = "https://deepfabric.dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "fabterm - the DeepFabric terminal and interactive tutorial")]
pub struct Args {
    /// Base URL that internal routes resolve against
    #[arg(long, default_value = DEFAULT_SITE_URL)]
    pub site_url: String,

    /// Directory holding tutorial progress
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Serve tutorial assets from this directory instead of the built-in copies
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,

    /// Where downloaded tutorial files are saved
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Print navigation URLs instead of opening a browser
    #[arg(long)]
    pub no_browser: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Write logs to this file; without it logging is off while the UI runs
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Start directly in the tutorial
    #[arg(long)]
    pub tutorial: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site_url: String,
    /// `None` when no data directory could be determined
    pub data_dir: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub download_dir: PathBuf,
    pub open_browser: bool,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
    pub start_in_tutorial: bool,
}

impl Args {
    pub fn into_config(self) -> Result<AppConfig> {
        let site_url = self.site_url.trim_end_matches('/').to_string();
        if !(site_url.starts_with("http://") || site_url.starts_with("https://")) {
            anyhow::bail!("--site-url must be an http(s) URL, got {}", self.site_url);
        }

        let data_dir = self
            .data_dir
            .or_else(|| dirs::data_dir().map(|d| d.join("fabterm")));

        let download_dir = match self.download_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        Ok(AppConfig {
            site_url,
            data_dir,
            assets_dir: self.assets_dir,
            download_dir,
            open_browser: !self.no_browser,
            log_level: self.log_level,
            log_file: self.log_file,
            start_in_tutorial: self.tutorial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let mut argv = vec!["fabterm"];
        argv.extend_from_slice(args);
        Args::parse_from(argv).into_config().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert!(config.open_browser);
        assert!(!config.start_in_tutorial);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--site-url",
            "http://localhost:3000/",
            "--data-dir",
            "/tmp/fab",
            "--download-dir",
            "/tmp/dl",
            "--no-browser",
            "--tutorial",
            "--log-level",
            "debug",
        ]);
        assert_eq!(config.site_url, "http://localhost:3000");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/fab")));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/dl"));
        assert!(!config.open_browser);
        assert!(config.start_in_tutorial);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_rejects_non_http_site() {
        let args = Args::parse_from(["fabterm", "--site-url", "ftp://example.com"]);
        assert!(args.into_config().is_err());
    }
}
