//! Scripted stand-ins for the engine, its providers and the host.

use crate::status::StatusCode;
use crate::traits::*;
use crate::types::{RawSolveResult, StatusTag};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One primitive call as the engine received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Solvable {
        src: String,
    },
    Facecube {
        maneuver: String,
        cube: String,
    },
    Permutation {
        maneuver: String,
    },
    Solve {
        src: String,
        best: bool,
    },
    SolveUltimate {
        src: String,
        tgt: String,
        step: u32,
        best: bool,
    },
}

/// Shared view of the calls a [`MockEngine`] received, usable after the
/// engine has been boxed away.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<EngineCall>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.0.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<EngineCall> {
        self.calls().pop()
    }

    fn push(&self, call: EngineCall) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(call);
        }
    }
}

/// An engine that returns canned answers and records every call.
///
/// `facecube` echoes its `cube` argument unless a fixed answer is set.
pub struct MockEngine {
    log: CallLog,
    solvable: bool,
    facecube: Option<String>,
    permutation: String,
    status: StatusTag,
    solution: String,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            log: CallLog::default(),
            solvable: true,
            facecube: None,
            permutation: "id".to_string(),
            status: StatusCode::Ok.tag(),
            solution: String::new(),
        }
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status.tag();
        self
    }

    /// Report a raw tag, including ones outside the wire contract.
    pub fn with_tag(mut self, value: i32) -> Self {
        self.status = StatusTag::new(value);
        self
    }

    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = solution.into();
        self
    }

    pub fn with_solvable(mut self, solvable: bool) -> Self {
        self.solvable = solvable;
        self
    }

    pub fn with_facecube(mut self, cube: impl Into<String>) -> Self {
        self.facecube = Some(cube.into());
        self
    }

    pub fn with_permutation(mut self, perm: impl Into<String>) -> Self {
        self.permutation = perm.into();
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn raw(&self) -> RawSolveResult {
        RawSolveResult {
            status: self.status,
            solution: self.solution.clone(),
        }
    }
}

impl EngineBinding for MockEngine {
    fn solvable(&self, src: &str) -> bool {
        self.log.push(EngineCall::Solvable { src: src.into() });
        self.solvable
    }

    fn facecube(&self, maneuver: &str, cube: &str) -> String {
        self.log.push(EngineCall::Facecube {
            maneuver: maneuver.into(),
            cube: cube.into(),
        });
        self.facecube.clone().unwrap_or_else(|| cube.to_string())
    }

    fn permutation(&self, maneuver: &str) -> String {
        self.log.push(EngineCall::Permutation {
            maneuver: maneuver.into(),
        });
        self.permutation.clone()
    }

    fn solve(&self, src: &str, best: bool) -> RawSolveResult {
        self.log.push(EngineCall::Solve {
            src: src.into(),
            best,
        });
        self.raw()
    }

    fn solve_ultimate(&self, src: &str, tgt: &str, step: u32, best: bool) -> RawSolveResult {
        self.log.push(EngineCall::SolveUltimate {
            src: src.into(),
            tgt: tgt.into(),
            step,
            best,
        });
        self.raw()
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// A provider that counts invocations and hands out a fresh engine built by
/// `make`, or fails when built with [`MockProvider::failing`].
pub struct MockProvider {
    variant: EngineVariant,
    invocations: Arc<AtomicUsize>,
    make: Box<dyn Fn() -> Option<MockEngine>>,
}

impl MockProvider {
    pub fn new(variant: EngineVariant) -> Self {
        Self::with_engine(variant, MockEngine::new)
    }

    pub fn with_engine(variant: EngineVariant, make: impl Fn() -> MockEngine + 'static) -> Self {
        Self {
            variant,
            invocations: Arc::new(AtomicUsize::new(0)),
            make: Box::new(move || Some(make())),
        }
    }

    pub fn failing(variant: EngineVariant) -> Self {
        Self {
            variant,
            invocations: Arc::new(AtomicUsize::new(0)),
            make: Box::new(|| None),
        }
    }

    /// Counter shared with this provider.
    pub fn invocations(&self) -> Arc<AtomicUsize> {
        self.invocations.clone()
    }
}

#[async_trait::async_trait(?Send)]
impl EngineProvider for MockProvider {
    fn variant(&self) -> EngineVariant {
        self.variant
    }

    async fn provide(&self) -> LoadResult<Box<dyn EngineBinding>> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        match (self.make)() {
            Some(engine) => Ok(Box::new(engine)),
            None => Err(LoadError::Module(format!(
                "mock {} engine unavailable",
                self.variant
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// A host with a hand-written process descriptor.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    process: Option<ProcessInfo>,
}

impl MockHost {
    /// Server-like: `process.versions.node` is the given string.
    pub fn server(node_version: &str) -> Self {
        Self::with_versions(serde_json::json!({ "node": node_version }))
    }

    /// Browser-like: no process descriptor at all.
    pub fn browser() -> Self {
        Self { process: None }
    }

    pub fn with_versions(versions: serde_json::Value) -> Self {
        Self {
            process: Some(ProcessInfo { versions }),
        }
    }
}

impl HostEnvironment for MockHost {
    fn process(&self) -> Option<ProcessInfo> {
        self.process.clone()
    }
}
