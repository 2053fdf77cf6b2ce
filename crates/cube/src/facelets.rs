//! Shape checks the native engine assumes of its inputs.
//!
//! The engine's facelet parser and move expander throw on input they cannot
//! read, and a throw cannot cross the C boundary without aborting the
//! process. These checks accept exactly the strings the engine can parse.

use crate::types::{FACELET_COUNT, FACE_LETTERS};

/// Center facelet of each face, in U R F D L B order.
const CENTERS: [usize; 6] = [4, 13, 22, 31, 40, 49];

/// Corner cubies as facelet triples, clockwise from the U/D sticker.
const CORNERS: [[usize; 3]; 8] = [
    [8, 9, 20],   // URF
    [6, 18, 38],  // UFL
    [0, 36, 47],  // ULB
    [2, 45, 11],  // UBR
    [29, 26, 15], // DFR
    [27, 44, 24], // DLF
    [33, 53, 42], // DBL
    [35, 17, 51], // DRB
];

/// Edge cubies as facelet pairs.
const EDGES: [[usize; 2]; 12] = [
    [5, 10],  // UR
    [7, 19],  // UF
    [3, 37],  // UL
    [1, 46],  // UB
    [32, 16], // DR
    [28, 25], // DF
    [30, 43], // DL
    [34, 52], // DB
    [23, 12], // FR
    [21, 41], // FL
    [50, 39], // BL
    [48, 14], // BR
];

/// Whether `cube` is a facelet string the engine can parse.
///
/// Requires 54 face letters and six distinct centers, and every corner
/// and edge cubie (colored by the centers) must appear at some position
/// in some orientation. Solvability is not checked.
pub fn is_well_formed(cube: &str) -> bool {
    let s = cube.as_bytes();
    if s.len() != FACELET_COUNT || !s.iter().all(|b| FACE_LETTERS.as_bytes().contains(b)) {
        return false;
    }

    let mut centers: Vec<u8> = CENTERS.iter().map(|&i| s[i]).collect();
    centers.sort_unstable();
    centers.dedup();
    if centers.len() != CENTERS.len() {
        return false;
    }

    // Home colors of a cubie are the centers of the faces it sits on.
    let face_of = |facelet: usize| s[CENTERS[facelet / 9]];

    let corners_ok = CORNERS.iter().all(|home| {
        let want = home.map(face_of);
        CORNERS.iter().any(|pos| {
            (0..3).any(|r| (0..3).all(|k| s[pos[(r + k) % 3]] == want[k]))
        })
    });
    let edges_ok = EDGES.iter().all(|home| {
        let want = home.map(face_of);
        EDGES.iter().any(|pos| {
            (0..2).any(|r| (0..2).all(|k| s[pos[(r + k) % 2]] == want[k]))
        })
    });

    corners_ok && edges_ok
}

/// Whether every `{n}` repeat count in `maneuver` fits the engine's `int`.
///
/// Other malformed maneuver text is skipped by the engine, not rejected.
pub fn is_readable_maneuver(maneuver: &str) -> bool {
    let mut rest = maneuver;
    while let Some(open) = rest.find('{') {
        rest = &rest[open + 1..];
        let digits: &str = match rest.find(|c: char| !c.is_ascii_digit()) {
            Some(end) => &rest[..end],
            None => rest,
        };
        if !digits.is_empty() && digits.parse::<i32>().is_err() {
            return false;
        }
    }
    true
}
