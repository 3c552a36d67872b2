//! Configuration data structures for the captiond service.
//!
//! This module defines the schema for the application settings: server
//! parameters, cache location, outbound fetch limits, the font asset, and
//! logging. The render geometry (size bounds, font scaling, baseline
//! placement) is intentionally NOT here; those are fixed constants in the
//! `render` module.

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Artifact store settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Outbound source-image fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Caption font settings.
    #[serde(default)]
    pub font: FontConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the on-disk artifact store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding rendered artifacts, one file per fingerprint.
    /// Created at startup if missing. Default: `cache`
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

/// Settings for fetching source images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Overall request timeout in seconds.
    /// Default: `30`
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,

    /// Maximum accepted response body size in bytes. Responses larger than
    /// this are rejected before decoding.
    /// Default: `16777216` (16 MiB)
    #[serde(default = "default_fetch_max_bytes")]
    pub max_bytes: usize,
}

/// Settings for the caption font.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    /// Path to the TTF/OTF file loaded once at startup.
    /// Default: `assets/impact.ttf`
    #[serde(default = "default_font_path")]
    pub path: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
            max_bytes: default_fetch_max_bytes(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: default_font_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_fetch_max_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_font_path() -> String {
    "assets/impact.ttf".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
