//! The typed API over a loaded engine.

use crate::solver::{self, SolveError};
use crate::status::normalize;
use crate::traits::EngineBinding;
use crate::types::{SolveOptions, SolveResult, CUBE_ID};

/// API object wrapping one engine instance for its whole lifetime.
///
/// Every operation is a plain delegation plus normalization; only
/// [`Cube::try_solve`] can fail.
pub struct Cube {
    engine: Box<dyn EngineBinding>,
}

impl Cube {
    pub fn new(engine: Box<dyn EngineBinding>) -> Self {
        Self { engine }
    }

    /// Whether `src` is a solvable facelet configuration.
    pub fn solvable(&self, src: &str) -> bool {
        tracing::debug!(src, "solvable");
        self.engine.solvable(src)
    }

    /// Apply `maneuver` to `cube` (the solved cube when `None`).
    pub fn get_facecube(&self, maneuver: &str, cube: Option<&str>) -> String {
        let cube = cube.unwrap_or(CUBE_ID);
        tracing::debug!(maneuver, cube, "facecube");
        self.engine.facecube(maneuver, cube)
    }

    /// Cycle-decomposed cubie permutation induced by `maneuver`.
    pub fn get_permutation(&self, maneuver: &str) -> String {
        tracing::debug!(maneuver, "permutation");
        self.engine.permutation(maneuver)
    }

    /// The engine's own short-form solve toward the solved cube.
    pub fn solve(&self, src: &str, best: bool) -> SolveResult {
        tracing::debug!(src, best, "solve");
        normalize(self.engine.solve(src, best))
    }

    /// Search for a maneuver taking `src` to `opts.dest` within `opts.step` moves.
    pub fn solve_ultimate(&self, src: &str, opts: &SolveOptions) -> SolveResult {
        tracing::debug!(src, dest = %opts.dest, step = opts.step, best = opts.best, "solve_ultimate");
        normalize(
            self.engine
                .solve_ultimate(src, &opts.dest, opts.step, opts.best),
        )
    }

    /// Solve toward the solved cube, failing on any non-OK status.
    pub fn try_solve(&self, src: &str, best: bool) -> Result<String, SolveError> {
        solver::try_solve(self, src, best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{EngineCall, MockEngine};
    use crate::status::StatusCode;

    #[test]
    fn test_facecube_defaults_to_solved_cube() {
        let engine = MockEngine::new();
        let log = engine.log();
        let cube = Cube::new(Box::new(engine));

        cube.get_facecube("R U", None);
        assert_eq!(
            log.last(),
            Some(EngineCall::Facecube {
                maneuver: "R U".into(),
                cube: CUBE_ID.into()
            })
        );
    }

    #[test]
    fn test_solve_ultimate_forwards_options() {
        let engine = MockEngine::new().with_solution("R U R'");
        let log = engine.log();
        let cube = Cube::new(Box::new(engine));

        let opts = SolveOptions::default().step(21).best(false);
        let r = cube.solve_ultimate("SRC", &opts);
        assert_eq!(r.status_code, StatusCode::Ok);
        assert_eq!(r.solution, "R U R'");
        assert_eq!(
            log.last(),
            Some(EngineCall::SolveUltimate {
                src: "SRC".into(),
                tgt: CUBE_ID.into(),
                step: 21,
                best: false
            })
        );
    }

    #[test]
    fn test_solve_uses_short_form_primitive() {
        let engine = MockEngine::new().with_status(StatusCode::NotFound);
        let log = engine.log();
        let cube = Cube::new(Box::new(engine));

        assert_eq!(cube.solve("SRC", true).status_code, StatusCode::NotFound);
        assert_eq!(
            log.last(),
            Some(EngineCall::Solve {
                src: "SRC".into(),
                best: true
            })
        );
    }

    #[test]
    fn test_non_ok_status_is_returned_not_raised() {
        let cube = Cube::new(Box::new(
            MockEngine::new().with_status(StatusCode::InvalidTgt),
        ));
        let r = cube.solve_ultimate(CUBE_ID, &SolveOptions::default().dest("bogus"));
        assert_eq!(r.status_code, StatusCode::InvalidTgt);
    }
}
