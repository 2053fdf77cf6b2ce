//! Scenario runner – execute scripted cube operations from YAML files.

use crate::facade::Cube;
use crate::status::StatusCode;
use crate::types::SolveOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

/// One operation. The key naming the operation decides the variant; keys
/// that belong to no operation are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    Solve(SolveStep),
    Color(ColorStep),
    Perm(PermStep),
    Solvable(SolvableStep),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolveStep {
    pub solve: String,
    pub target: Option<String>,
    pub step: Option<u32>,
    pub best: Option<bool>,
    pub expect: Option<StatusCode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorStep {
    pub color: String,
    pub cube: Option<String>,
    pub expect_cube: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermStep {
    pub perm: String,
    pub expect_perm: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolvableStep {
    pub solvable: String,
    pub expect_solvable: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub op: String,
    pub status: StepStatus,
    pub output: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: Option<String>,
    pub overall_status: StepStatus,
    pub step_results: Vec<StepOutcome>,
}

/// Load a scenario from a YAML string.
pub fn load_scenario(yaml: &str) -> Result<Scenario, String> {
    serde_yaml::from_str(yaml).map_err(|e| format!("failed to parse scenario YAML: {}", e))
}

/// Execute every step in order and collect the outcomes.
pub fn run_scenario(scenario: &Scenario, cube: &Cube) -> ScenarioResult {
    let mut step_results = Vec::with_capacity(scenario.steps.len());
    let mut overall = StepStatus::Pass;

    for (i, step) in scenario.steps.iter().enumerate() {
        let outcome = run_step(step, cube);
        if outcome.status == StepStatus::Fail {
            tracing::warn!(
                step = i,
                op = %outcome.op,
                message = outcome.message.as_deref().unwrap_or(""),
                "scenario step failed"
            );
            overall = StepStatus::Fail;
        }
        step_results.push(outcome);
    }

    ScenarioResult {
        name: scenario.name.clone(),
        overall_status: overall,
        step_results,
    }
}

fn run_step(step: &ScenarioStep, cube: &Cube) -> StepOutcome {
    match step {
        ScenarioStep::Solve(SolveStep {
            solve,
            target,
            step,
            best,
            expect,
        }) => {
            let mut opts = SolveOptions::default();
            if let Some(t) = target {
                opts = opts.dest(t.clone());
            }
            if let Some(s) = step {
                opts = opts.step(*s);
            }
            if let Some(b) = best {
                opts = opts.best(*b);
            }
            let r = cube.solve_ultimate(solve, &opts);
            let output = serde_json::to_value(&r).unwrap_or_default();
            check("solve", output, expect.as_ref(), &r.status_code)
        }
        ScenarioStep::Color(ColorStep {
            color,
            cube: start,
            expect_cube,
        }) => {
            let out = cube.get_facecube(color, start.as_deref());
            check("color", serde_json::json!(out), expect_cube.as_ref(), &out)
        }
        ScenarioStep::Perm(PermStep { perm, expect_perm }) => {
            let out = cube.get_permutation(perm);
            check("perm", serde_json::json!(out), expect_perm.as_ref(), &out)
        }
        ScenarioStep::Solvable(SolvableStep {
            solvable,
            expect_solvable,
        }) => {
            let out = cube.solvable(solvable);
            check("solvable", serde_json::json!(out), expect_solvable.as_ref(), &out)
        }
    }
}

fn check<T: PartialEq + std::fmt::Debug>(
    op: &str,
    output: serde_json::Value,
    expected: Option<&T>,
    actual: &T,
) -> StepOutcome {
    let (status, message) = match expected {
        Some(e) if e != actual => (
            StepStatus::Fail,
            Some(format!("expected {:?}, got {:?}", e, actual)),
        ),
        _ => (StepStatus::Pass, None),
    };
    StepOutcome {
        op: op.to_string(),
        status,
        output,
        message,
    }
}
