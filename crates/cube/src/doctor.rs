//! Doctor – report which engine build this host selects and whether it loads.

use crate::config::EngineConfig;
use crate::loader::Loader;
use crate::traits::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    pub os: String,
    pub arch: String,
    /// The host's process descriptor, as the loader saw it.
    pub process: Option<ProcessInfo>,
    pub variant: EngineVariant,
    /// Resolved library path (server build) or module specifier.
    pub location: String,
    pub engine_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run the doctor check against the real platform providers.
pub async fn run_doctor(host: &dyn HostEnvironment, config: &EngineConfig) -> DoctorReport {
    run_doctor_with(&Loader::from_config(config), host, config).await
}

pub async fn run_doctor_with(
    loader: &Loader,
    host: &dyn HostEnvironment,
    config: &EngineConfig,
) -> DoctorReport {
    let variant = loader.select(host).variant();
    let (engine_loaded, error) = match loader.load(host).await {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    DoctorReport {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        process: host.process(),
        variant,
        location: location(variant, config),
        engine_loaded,
        error,
    }
}

fn location(variant: EngineVariant, config: &EngineConfig) -> String {
    match variant {
        EngineVariant::Web => config.web_module.clone(),
        EngineVariant::Server => {
            #[cfg(not(target_arch = "wasm32"))]
            {
                match crate::native::resolve_library(config) {
                    Ok(path) => path.display().to_string(),
                    Err(e) => format!("unresolved ({})", e),
                }
            }
            #[cfg(target_arch = "wasm32")]
            {
                config.server_module.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockHost, MockProvider};

    #[tokio::test]
    async fn test_browser_host_with_missing_engine() {
        let loader = Loader::new(
            Box::new(MockProvider::new(EngineVariant::Server)),
            Box::new(MockProvider::failing(EngineVariant::Web)),
        );
        let report = run_doctor_with(&loader, &MockHost::browser(), &EngineConfig::default()).await;
        assert_eq!(report.variant, EngineVariant::Web);
        assert_eq!(report.location, "./jscube/jscube.mjs");
        assert!(!report.engine_loaded);
        assert!(report.error.unwrap().contains("web"));
        assert!(report.process.is_none());
    }

    #[tokio::test]
    async fn test_server_host_loads() {
        let loader = Loader::new(
            Box::new(MockProvider::new(EngineVariant::Server)),
            Box::new(MockProvider::failing(EngineVariant::Web)),
        );
        let report =
            run_doctor_with(&loader, &MockHost::server("20.0.0"), &EngineConfig::default()).await;
        assert_eq!(report.variant, EngineVariant::Server);
        assert!(report.engine_loaded);
        assert!(report.error.is_none());

        let j = serde_json::to_value(&report).unwrap();
        assert_eq!(j["variant"], "server");
        assert!(j.get("error").is_none());
    }
}
