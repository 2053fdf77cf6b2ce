//! Platform implementations of the engine providers and host probe.
//!
//! - [`ServerProvider`]: native shared library (or the server ES module on wasm32)
//! - [`WebProvider`]: browser ES module; wasm32 only
//! - [`SystemHost`]: the host this code is actually running in

use crate::config::EngineConfig;
use crate::traits::*;

// ===========================================================================
// Server build
// ===========================================================================

pub struct ServerProvider {
    config: EngineConfig,
}

impl ServerProvider {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait(?Send)]
impl EngineProvider for ServerProvider {
    fn variant(&self) -> EngineVariant {
        EngineVariant::Server
    }

    async fn provide(&self) -> LoadResult<Box<dyn EngineBinding>> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let engine = crate::native::NativeEngine::load_configured(&self.config)?;
            Ok(Box::new(engine))
        }
        #[cfg(target_arch = "wasm32")]
        {
            let engine = crate::web::JsEngine::import(&self.config.server_module).await?;
            Ok(Box::new(engine))
        }
    }
}

// ===========================================================================
// Web build
// ===========================================================================

pub struct WebProvider {
    config: EngineConfig,
}

impl WebProvider {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait(?Send)]
impl EngineProvider for WebProvider {
    fn variant(&self) -> EngineVariant {
        EngineVariant::Web
    }

    async fn provide(&self) -> LoadResult<Box<dyn EngineBinding>> {
        #[cfg(target_arch = "wasm32")]
        {
            let engine = crate::web::JsEngine::import(&self.config.web_module).await?;
            Ok(Box::new(engine))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Err(LoadError::Unsupported(format!(
                "web engine build '{}' requires a wasm32 host",
                self.config.web_module
            )))
        }
    }
}

// ===========================================================================
// Host probe
// ===========================================================================

/// The real host. Native processes always report a runtime version.
pub struct SystemHost;

impl HostEnvironment for SystemHost {
    fn process(&self) -> Option<ProcessInfo> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut versions = serde_json::Map::new();
            versions.insert(
                crate::loader::NATIVE_RUNTIME_KEY.to_string(),
                serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
            );
            Some(ProcessInfo {
                versions: serde_json::Value::Object(versions),
            })
        }
        #[cfg(target_arch = "wasm32")]
        {
            crate::web::JsHost.process()
        }
    }
}
