//! Convenience solver: one call, solution or error.

use crate::facade::Cube;
use crate::status::StatusCode;
use crate::types::SolveOptions;

/// A solve that ended in any status other than OK.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{}] {}: {}", .status.tag().value, .status, .status.description())]
pub struct SolveError {
    pub status: StatusCode,
}

/// Solve `src` toward the solved cube with the default depth bound.
///
/// The target and depth are fixed; callers needing either should use
/// [`Cube::solve_ultimate`]. Not retried.
pub fn try_solve(cube: &Cube, src: &str, best: bool) -> Result<String, SolveError> {
    let result = cube.solve_ultimate(src, &SolveOptions::default().best(best));
    if result.status_code != StatusCode::Ok {
        tracing::warn!(status = %result.status_code, "solve failed");
        return Err(SolveError {
            status: result.status_code,
        });
    }
    Ok(result.solution)
}
