//! Cube crate – typed facade over the Rubik's cube solving engine.
//!
//! The engine itself (two-phase search, pruning tables) ships separately as
//! a native shared library or an Emscripten module. This crate picks the
//! right build for the host, loads it once per [`create_cube`] call, and
//! exposes it through [`Cube`] with named defaults and a closed
//! [`StatusCode`] in place of the engine's boxed status tags.

pub mod config;
pub mod doctor;
pub mod facade;
pub mod facelets;
pub mod loader;
pub mod mock;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
pub mod platform;
pub mod scenario;
pub mod solver;
pub mod status;
pub mod traits;
pub mod types;
#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-exports for convenience
pub use facade::Cube;
pub use loader::Loader;
pub use solver::SolveError;
pub use status::StatusCode;
pub use traits::{EngineBinding, EngineProvider, EngineVariant, HostEnvironment, LoadError, LoadResult};
pub use types::{SolveOptions, SolveResult, CUBE_ID, DEFAULT_STEP};

use platform::SystemHost;

/// Load the engine build matching the current host and wrap it.
///
/// Configuration comes from `global_config.yaml` and `CUBE__*` variables on
/// native targets; wasm32 builds use the defaults. Each call loads afresh.
pub async fn create_cube() -> LoadResult<Cube> {
    #[cfg(not(target_arch = "wasm32"))]
    let config = crate::config::load_config()?;
    #[cfg(target_arch = "wasm32")]
    let config = crate::config::CubeConfig::default();

    let loader = Loader::from_config(&config.engine);
    create_cube_with(&loader, &SystemHost).await
}

/// Same as [`create_cube`] with an injected loader and host.
pub async fn create_cube_with(loader: &Loader, host: &dyn HostEnvironment) -> LoadResult<Cube> {
    let engine = loader.load(host).await?;
    Ok(Cube::new(engine))
}
