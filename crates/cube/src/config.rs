//! Layered configuration: `global_config.yaml`, a local override, then
//! `CUBE__*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CubeConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where each engine build is found.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Base name of the native library (`cube` → `libcube.so`).
    #[serde(default = "default_library_name")]
    pub library_name: String,
    /// Explicit library path; skips the directory search when set.
    #[serde(default)]
    pub library_path: Option<PathBuf>,
    /// Extra directories searched before the executable and current directories.
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
    /// ES module specifier of the server build, for wasm hosts running under a server runtime.
    #[serde(default = "default_server_module")]
    pub server_module: String,
    /// ES module specifier of the browser build.
    #[serde(default = "default_web_module")]
    pub web_module: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            library_name: default_library_name(),
            library_path: None,
            search_dirs: Vec::new(),
            server_module: default_server_module(),
            web_module: default_web_module(),
        }
    }
}

fn default_library_name() -> String {
    "cube".to_string()
}

fn default_server_module() -> String {
    "./jscube/jscube.node.mjs".to_string()
}

fn default_web_module() -> String {
    "./jscube/jscube.mjs".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "true_default")]
    pub show_time: bool,
    #[serde(default)]
    pub show_file: bool,
    #[serde(default)]
    pub show_line: bool,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            show_time: true,
            show_file: false,
            show_line: false,
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn true_default() -> bool {
    true
}

#[cfg(not(target_arch = "wasm32"))]
pub use loading::load_config;

#[cfg(not(target_arch = "wasm32"))]
mod loading {
    use super::CubeConfig;
    use config::{Config, ConfigError, Environment, File};
    use std::path::{Path, PathBuf};

    /// Look next to the crate manifest first, then in the current directory.
    fn locate(file_name: &str) -> PathBuf {
        let manifest_dir =
            std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
        let in_manifest = Path::new(&manifest_dir).join(file_name);
        if in_manifest.exists() {
            in_manifest
        } else {
            PathBuf::from(file_name)
        }
    }

    pub fn load_config() -> Result<CubeConfig, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(locate("global_config.yaml")).required(false))
            // Local override
            .add_source(File::from(locate(".global_config.yaml")).required(false))
            // Nested env vars like CUBE__ENGINE__LIBRARY_PATH=/opt/lib/libcube.so
            .add_source(Environment::with_prefix("CUBE").separator("__"));

        builder.build()?.try_deserialize()
    }
}
