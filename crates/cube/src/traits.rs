use crate::types::RawSolveResult;
use serde::{Deserialize, Serialize};

/// Result type for engine loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Failure to obtain an engine. Never translated into a [`StatusCode`](crate::StatusCode).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("engine library not found: {0}")]
    NotFound(String),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to load engine library '{path}': {source}")]
    Library {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[cfg(not(target_arch = "wasm32"))]
    #[error("symbol '{symbol}' not found in '{path}': {source}")]
    Symbol {
        symbol: String,
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("engine module failed to load: {0}")]
    Module(String),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

// ---------------------------------------------------------------------------
// Engine binding – the raw foreign interface
// ---------------------------------------------------------------------------

/// The five primitives an engine build exposes.
///
/// Values cross as plain strings, booleans and integers; the solve
/// primitives return the status still boxed.
pub trait EngineBinding {
    fn solvable(&self, src: &str) -> bool;

    fn facecube(&self, maneuver: &str, cube: &str) -> String;

    fn permutation(&self, maneuver: &str) -> String;

    /// Solve `src` toward the solved cube with the engine's fixed depth bound.
    fn solve(&self, src: &str, best: bool) -> RawSolveResult;

    fn solve_ultimate(&self, src: &str, tgt: &str, step: u32, best: bool) -> RawSolveResult;
}

// ---------------------------------------------------------------------------
// Engine providers
// ---------------------------------------------------------------------------

/// The engine build a provider produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineVariant {
    Server,
    Web,
}

impl std::fmt::Display for EngineVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineVariant::Server => f.write_str("server"),
            EngineVariant::Web => f.write_str("web"),
        }
    }
}

/// Produces an initialized engine instance.
#[async_trait::async_trait(?Send)]
pub trait EngineProvider {
    fn variant(&self) -> EngineVariant;

    async fn provide(&self) -> LoadResult<Box<dyn EngineBinding>>;
}

// ---------------------------------------------------------------------------
// Host environment
// ---------------------------------------------------------------------------

/// Process descriptor a server-like host exposes.
///
/// `versions` is kept untyped: hosts disagree on its shape, and the loader
/// only cares whether a runtime-version entry is a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    #[serde(default)]
    pub versions: serde_json::Value,
}

/// Ambient capabilities of the host the engine is loaded into.
pub trait HostEnvironment {
    /// The process descriptor, if the host has one.
    fn process(&self) -> Option<ProcessInfo>;
}
