//! Browser build of the engine: the Emscripten ES module, driven through
//! wasm-bindgen.
//!
//! The module's default export is a factory returning a promise of the
//! module object, which carries `js_solvable`, `js_facecube`,
//! `js_permutation`, `js_solve` and `js_solve_ultimate`. Solve results come
//! back as a two-element array `[status, solution]` whose status is an embind
//! enum object with a numeric `value`.

use crate::status::StatusCode;
use crate::traits::{EngineBinding, HostEnvironment, LoadError, LoadResult, ProcessInfo};
use crate::types::{RawSolveResult, StatusTag};
use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = "export function import_module(specifier) { return import(specifier); }")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn import_module(specifier: &str) -> Result<Promise, JsValue>;
}

/// An instantiated Emscripten engine module.
pub struct JsEngine {
    module: JsValue,
    specifier: String,
}

impl JsEngine {
    /// Import `specifier`, run its default-export factory and await the module.
    pub async fn import(specifier: &str) -> LoadResult<Self> {
        let promise = import_module(specifier).map_err(|e| module_error(specifier, e))?;
        let namespace = JsFuture::from(promise)
            .await
            .map_err(|e| module_error(specifier, e))?;

        let factory: Function = Reflect::get(&namespace, &JsValue::from_str("default"))
            .map_err(|e| module_error(specifier, e))?
            .dyn_into()
            .map_err(|_| {
                LoadError::Module(format!("'{}' has no default export factory", specifier))
            })?;

        let pending = factory
            .call0(&JsValue::NULL)
            .map_err(|e| module_error(specifier, e))?;
        let module = JsFuture::from(Promise::resolve(&pending))
            .await
            .map_err(|e| module_error(specifier, e))?;

        tracing::info!(module = specifier, "web engine loaded");
        Ok(Self {
            module,
            specifier: specifier.to_string(),
        })
    }

    pub fn specifier(&self) -> &str {
        &self.specifier
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Option<JsValue> {
        let func: Function = Reflect::get(&self.module, &JsValue::from_str(name))
            .ok()?
            .dyn_into()
            .ok()?;
        let args: Array = args.iter().collect();
        match func.apply(&self.module, &args) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(function = name, error = ?e, "engine call threw");
                None
            }
        }
    }

    fn call_string(&self, name: &str, args: &[JsValue]) -> String {
        self.call(name, args)
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }
}

impl EngineBinding for JsEngine {
    fn solvable(&self, src: &str) -> bool {
        self.call("js_solvable", &[JsValue::from_str(src)])
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn facecube(&self, maneuver: &str, cube: &str) -> String {
        self.call_string(
            "js_facecube",
            &[JsValue::from_str(maneuver), JsValue::from_str(cube)],
        )
    }

    fn permutation(&self, maneuver: &str) -> String {
        self.call_string("js_permutation", &[JsValue::from_str(maneuver)])
    }

    fn solve(&self, src: &str, best: bool) -> RawSolveResult {
        raw_result(self.call(
            "js_solve",
            &[JsValue::from_str(src), JsValue::from_bool(best)],
        ))
    }

    fn solve_ultimate(&self, src: &str, tgt: &str, step: u32, best: bool) -> RawSolveResult {
        raw_result(self.call(
            "js_solve_ultimate",
            &[
                JsValue::from_str(src),
                JsValue::from_str(tgt),
                JsValue::from_f64(f64::from(step)),
                JsValue::from_bool(best),
            ],
        ))
    }
}

/// Split a `[status, solution]` pair (or `{status_code, solution}` object).
fn raw_result(value: Option<JsValue>) -> RawSolveResult {
    let unknown = || RawSolveResult {
        status: StatusCode::UnknownErr.tag(),
        solution: String::new(),
    };
    let Some(value) = value else {
        return unknown();
    };

    let (boxed, solution) = if Array::is_array(&value) {
        (
            Reflect::get_u32(&value, 0).ok(),
            Reflect::get_u32(&value, 1).ok(),
        )
    } else {
        (
            Reflect::get(&value, &JsValue::from_str("status_code")).ok(),
            Reflect::get(&value, &JsValue::from_str("solution")).ok(),
        )
    };

    let tag = boxed.as_ref().and_then(|b| {
        // Plain numbers are accepted as well as boxed enum objects.
        b.as_f64().or_else(|| {
            Reflect::get(b, &JsValue::from_str("value"))
                .ok()
                .and_then(|v| v.as_f64())
        })
    });

    match tag {
        Some(value) => RawSolveResult {
            status: StatusTag::new(value as i32),
            solution: solution.and_then(|s| s.as_string()).unwrap_or_default(),
        },
        None => unknown(),
    }
}

fn module_error(specifier: &str, err: JsValue) -> LoadError {
    let detail = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    LoadError::Module(format!("{}: {}", specifier, detail))
}

// ---------------------------------------------------------------------------
// JS host probe
// ---------------------------------------------------------------------------

/// Reads `globalThis.process.versions.node` from the JS host.
pub struct JsHost;

impl HostEnvironment for JsHost {
    fn process(&self) -> Option<ProcessInfo> {
        let process = Reflect::get(&js_sys::global(), &JsValue::from_str("process")).ok()?;
        if !process.is_object() {
            return None;
        }
        let versions = Reflect::get(&process, &JsValue::from_str("versions")).ok()?;
        if !versions.is_object() {
            return Some(ProcessInfo::default());
        }

        let mut record = serde_json::Map::new();
        if let Ok(node) = Reflect::get(&versions, &JsValue::from_str("node")) {
            if let Some(v) = node.as_string() {
                record.insert("node".into(), serde_json::Value::String(v));
            } else if let Some(n) = node.as_f64() {
                record.insert("node".into(), serde_json::json!(n));
            }
        }
        Some(ProcessInfo {
            versions: serde_json::Value::Object(record),
        })
    }
}
