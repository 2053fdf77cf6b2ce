use crate::status::StatusCode;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants shared with the engine
// ---------------------------------------------------------------------------

/// Facelet string of the solved cube: 9×U, 9×R, 9×F, 9×D, 9×L, 9×B.
pub const CUBE_ID: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

/// Size of every output buffer handed to the native engine.
///
/// Large enough for a facelet string (54), a formatted solution (<= 90) and
/// the longest cycle-decomposed permutation (< 128).
pub const CUBE_BS: usize = 128;

/// Search-depth bound used when the caller does not pick one.
pub const DEFAULT_STEP: u32 = 30;

/// Number of facelets in a [`CUBE_ID`]-shaped string.
pub const FACELET_COUNT: usize = 54;

/// The six face letters, in canonical face order.
pub const FACE_LETTERS: &str = "URFDLB";

// ---------------------------------------------------------------------------
// Raw engine values
// ---------------------------------------------------------------------------

/// The engine's boxed status: an opaque integer tag.
///
/// Only [`StatusCode::from_tag`] looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTag {
    pub value: i32,
}

impl StatusTag {
    pub fn new(value: i32) -> Self {
        Self { value }
    }
}

/// A solve outcome exactly as the engine reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSolveResult {
    pub status: StatusTag,
    pub solution: String,
}

// ---------------------------------------------------------------------------
// Typed results – the stable output contract
// ---------------------------------------------------------------------------

/// Normalized outcome of a solve request.
///
/// `solution` is a maneuver when `status_code` is [`StatusCode::Ok`]; for any
/// other status its content is unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResult {
    pub status_code: StatusCode,
    pub solution: String,
}

impl SolveResult {
    pub fn is_ok(&self) -> bool {
        self.status_code == StatusCode::Ok
    }
}

/// Trailing parameters of [`Cube::solve_ultimate`](crate::Cube::solve_ultimate).
///
/// Defaults: `dest` = [`CUBE_ID`], `step` = [`DEFAULT_STEP`], `best` = `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Target configuration.
    #[serde(default = "default_dest")]
    pub dest: String,
    /// Upper bound on the search depth (not a timeout).
    #[serde(default = "default_step")]
    pub step: u32,
    /// Keep searching for a shorter solution after the first one is found.
    #[serde(default = "default_best")]
    pub best: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            dest: default_dest(),
            step: default_step(),
            best: default_best(),
        }
    }
}

impl SolveOptions {
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = dest.into();
        self
    }

    pub fn step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub fn best(mut self, best: bool) -> Self {
        self.best = best;
        self
    }
}

fn default_dest() -> String {
    CUBE_ID.to_string()
}

fn default_step() -> u32 {
    DEFAULT_STEP
}

fn default_best() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_id_shape() {
        assert_eq!(CUBE_ID.len(), FACELET_COUNT);
        for face in FACE_LETTERS.chars() {
            assert_eq!(CUBE_ID.chars().filter(|c| *c == face).count(), 9);
        }
    }

    #[test]
    fn test_solve_options_defaults() {
        let opts = SolveOptions::default();
        assert_eq!(opts.dest, CUBE_ID);
        assert_eq!(opts.step, 30);
        assert!(opts.best);
    }

    #[test]
    fn test_solve_options_partial_deserialize() {
        let opts: SolveOptions = serde_json::from_str(r#"{ "step": 12 }"#).unwrap();
        assert_eq!(opts.step, 12);
        assert_eq!(opts.dest, CUBE_ID);
        assert!(opts.best);
    }

    #[test]
    fn test_solve_result_serializes_status_name() {
        let r = SolveResult {
            status_code: StatusCode::NotFound,
            solution: String::new(),
        };
        let j = serde_json::to_value(&r).unwrap();
        assert_eq!(j["status_code"], "NOT_FOUND");
    }
}
