use std::sync::atomic::Ordering;

use cube::config::EngineConfig;
use cube::mock::{MockEngine, MockHost, MockProvider};
use cube::{create_cube_with, EngineVariant, LoadError, Loader, StatusCode};

fn providers() -> (MockProvider, MockProvider) {
    (
        MockProvider::new(EngineVariant::Server),
        MockProvider::new(EngineVariant::Web),
    )
}

#[tokio::test]
async fn server_host_loads_server_variant_only() {
    let (server, web) = providers();
    let (server_calls, web_calls) = (server.invocations(), web.invocations());
    let loader = Loader::new(Box::new(server), Box::new(web));

    let host = MockHost::server("20.11.1");
    assert_eq!(loader.select(&host).variant(), EngineVariant::Server);
    create_cube_with(&loader, &host).await.unwrap();

    assert_eq!(server_calls.load(Ordering::SeqCst), 1);
    assert_eq!(web_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn browser_host_loads_web_variant_only() {
    let (server, web) = providers();
    let (server_calls, web_calls) = (server.invocations(), web.invocations());
    let loader = Loader::new(Box::new(server), Box::new(web));

    let host = MockHost::browser();
    assert_eq!(loader.select(&host).variant(), EngineVariant::Web);
    create_cube_with(&loader, &host).await.unwrap();

    assert_eq!(server_calls.load(Ordering::SeqCst), 0);
    assert_eq!(web_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn numeric_runtime_version_selects_web() {
    let (server, web) = providers();
    let web_calls = web.invocations();
    let loader = Loader::new(Box::new(server), Box::new(web));

    let host = MockHost::with_versions(serde_json::json!({ "node": 20 }));
    create_cube_with(&loader, &host).await.unwrap();
    assert_eq!(web_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn load_failure_propagates_unmapped() {
    let server = MockProvider::failing(EngineVariant::Server);
    let web = MockProvider::new(EngineVariant::Web);
    let web_calls = web.invocations();
    let loader = Loader::new(Box::new(server), Box::new(web));

    let result = create_cube_with(&loader, &MockHost::server("18.0.0")).await;
    match result {
        Err(LoadError::Module(msg)) => assert!(msg.contains("server")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("load should have failed"),
    }
    // No fallback to the other build.
    assert_eq!(web_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn every_factory_call_loads_again() {
    let server = MockProvider::new(EngineVariant::Server);
    let server_calls = server.invocations();
    let loader = Loader::new(Box::new(server), Box::new(MockProvider::new(EngineVariant::Web)));
    let host = MockHost::server("20.0.0");

    create_cube_with(&loader, &host).await.unwrap();
    create_cube_with(&loader, &host).await.unwrap();
    assert_eq!(server_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn loaded_engine_is_the_one_the_provider_built() {
    let server = MockProvider::with_engine(EngineVariant::Server, || {
        MockEngine::new()
            .with_status(StatusCode::NotFound)
            .with_permutation("(ufl,ubr,urf)")
    });
    let loader = Loader::new(Box::new(server), Box::new(MockProvider::new(EngineVariant::Web)));

    let cube = create_cube_with(&loader, &MockHost::server("20.0.0"))
        .await
        .unwrap();
    assert_eq!(cube.get_permutation("RB'RF2R'BRF2R2"), "(ufl,ubr,urf)");
    assert_eq!(cube.try_solve("SRC", true).unwrap_err().status, StatusCode::NotFound);
}

#[tokio::test]
async fn real_web_provider_is_unsupported_on_native_hosts() {
    let loader = Loader::from_config(&EngineConfig::default());
    let result = create_cube_with(&loader, &MockHost::browser()).await;
    assert!(matches!(result, Err(LoadError::Unsupported(_))));
}
