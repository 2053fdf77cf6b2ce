//! Environment loader – picks the engine build for the host and loads it.

use crate::config::EngineConfig;
use crate::platform::{ServerProvider, WebProvider};
use crate::traits::*;

/// Runtime-version key a JS server runtime puts in `process.versions`.
pub const NODE_RUNTIME_KEY: &str = "node";

/// Runtime-version key [`SystemHost`](crate::platform::SystemHost) reports
/// for native processes.
pub const NATIVE_RUNTIME_KEY: &str = "native";

/// A host is server-like when it exposes a process descriptor whose
/// `versions` record carries a string-valued runtime version.
pub fn is_server_host(host: &dyn HostEnvironment) -> bool {
    host.process().is_some_and(|process| {
        [NODE_RUNTIME_KEY, NATIVE_RUNTIME_KEY]
            .iter()
            .any(|key| process.versions.get(*key).is_some_and(|v| v.is_string()))
    })
}

/// Holds one provider per engine build and invokes exactly one of them.
pub struct Loader {
    server: Box<dyn EngineProvider>,
    web: Box<dyn EngineProvider>,
}

impl Loader {
    pub fn new(server: Box<dyn EngineProvider>, web: Box<dyn EngineProvider>) -> Self {
        Self { server, web }
    }

    /// Loader backed by the real platform providers.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Box::new(ServerProvider::new(config.clone())),
            Box::new(WebProvider::new(config.clone())),
        )
    }

    pub fn select(&self, host: &dyn HostEnvironment) -> &dyn EngineProvider {
        if is_server_host(host) {
            self.server.as_ref()
        } else {
            self.web.as_ref()
        }
    }

    /// Select a build for `host` and produce the engine. Load failures are
    /// returned as-is.
    pub async fn load(&self, host: &dyn HostEnvironment) -> LoadResult<Box<dyn EngineBinding>> {
        let provider = self.select(host);
        tracing::info!(variant = %provider.variant(), "loading engine");
        provider.provide().await.inspect_err(|e| {
            tracing::error!(variant = %provider.variant(), error = %e, "engine load failed");
        })
    }
}
