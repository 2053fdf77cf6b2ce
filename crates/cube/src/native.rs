//! Server build of the engine: a C-ABI shared library loaded at runtime.
//!
//! Exported symbols (all buffers are at least [`CUBE_BS`] bytes):
//!
//! ```c
//! int  solve_ultimate(const char *src, const char *tgt, char *buf, int step, int best, int formated);
//! int  solve(const char *src, char *buf, int best);
//! int  solvable(const char *cube);
//! void facecube(const char *cube, const char *maneuver, char *buf);
//! void permutation(const char *maneuver, char *buf);
//! ```
//!
//! The engine keeps a single global solver, so every call into any loaded
//! engine holds one process-wide lock. Facelet strings and maneuvers it
//! cannot parse are answered here (`false` / empty string) without a call,
//! since the engine reports those by throwing.

use crate::config::EngineConfig;
use crate::facelets::{is_readable_maneuver, is_well_formed};
use crate::traits::{EngineBinding, LoadError, LoadResult};
use crate::types::{RawSolveResult, StatusTag, CUBE_BS};
use libloading::Library;
use std::ffi::{c_char, c_int, CStr, CString};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

type SolveUltimateFn =
    unsafe extern "C" fn(*const c_char, *const c_char, *mut c_char, c_int, c_int, c_int) -> c_int;
type SolveFn = unsafe extern "C" fn(*const c_char, *mut c_char, c_int) -> c_int;
type SolvableFn = unsafe extern "C" fn(*const c_char) -> c_int;
type FacecubeFn = unsafe extern "C" fn(*const c_char, *const c_char, *mut c_char);
type PermutationFn = unsafe extern "C" fn(*const c_char, *mut c_char);

/// Ask for space-separated maneuver text rather than raw move bytes.
const FORMATTED: c_int = 1;

/// Held for the duration of every engine call.
static ENGINE_LOCK: Mutex<()> = Mutex::new(());

fn serialized<R>(call: impl FnOnce() -> R) -> R {
    let _guard = ENGINE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    call()
}

/// A loaded native engine.
pub struct NativeEngine {
    solve_ultimate: SolveUltimateFn,
    solve: SolveFn,
    solvable: SolvableFn,
    facecube: FacecubeFn,
    permutation: PermutationFn,
    path: String,
    // Must outlive the function pointers above.
    _library: Library,
}

impl NativeEngine {
    /// Load the engine library at `path` and resolve all five symbols.
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref().display().to_string();

        // SAFETY: the engine library has no load-time side effects beyond
        // static initialization of its tables.
        let library = unsafe { Library::new(&path) }.map_err(|source| LoadError::Library {
            path: path.clone(),
            source,
        })?;

        // SAFETY: the aliases above mirror the engine's C header.
        let engine = unsafe {
            Self {
                solve_ultimate: symbol(&library, "solve_ultimate", &path)?,
                solve: symbol(&library, "solve", &path)?,
                solvable: symbol(&library, "solvable", &path)?,
                facecube: symbol(&library, "facecube", &path)?,
                permutation: symbol(&library, "permutation", &path)?,
                path,
                _library: library,
            }
        };

        tracing::info!(path = %engine.path, "native engine loaded");
        Ok(engine)
    }

    /// Resolve the library per `config`, then load it.
    pub fn load_configured(config: &EngineConfig) -> LoadResult<Self> {
        Self::load(resolve_library(config)?)
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Copy a function pointer out of `library`.
///
/// # Safety
///
/// `F` must match the exported symbol's real signature.
unsafe fn symbol<F: Copy>(library: &Library, name: &str, path: &str) -> LoadResult<F> {
    let c_name = format!("{}\0", name);
    library
        .get::<F>(c_name.as_bytes())
        .map(|sym| *sym)
        .map_err(|source| LoadError::Symbol {
            symbol: name.to_string(),
            path: path.to_string(),
            source,
        })
}

impl EngineBinding for NativeEngine {
    fn solvable(&self, src: &str) -> bool {
        if !is_well_formed(src) {
            tracing::debug!(src, "malformed cube, not solvable");
            return false;
        }
        let src = c_string(src);
        // SAFETY: `src` is NUL-terminated and outlives the call.
        serialized(|| unsafe { (self.solvable)(src.as_ptr()) != 0 })
    }

    fn facecube(&self, maneuver: &str, cube: &str) -> String {
        if !is_well_formed(cube) || !is_readable_maneuver(maneuver) {
            tracing::debug!(maneuver, cube, "malformed input, no facecube");
            return String::new();
        }
        let maneuver = c_string(maneuver);
        let cube = c_string(cube);
        let mut buf = [0u8; CUBE_BS];
        // SAFETY: inputs are NUL-terminated; `buf` holds CUBE_BS bytes.
        serialized(|| unsafe {
            (self.facecube)(cube.as_ptr(), maneuver.as_ptr(), buf.as_mut_ptr().cast());
        });
        read_buffer(&buf)
    }

    fn permutation(&self, maneuver: &str) -> String {
        if !is_readable_maneuver(maneuver) {
            tracing::debug!(maneuver, "malformed maneuver, no permutation");
            return String::new();
        }
        let maneuver = c_string(maneuver);
        let mut buf = [0u8; CUBE_BS];
        // SAFETY: as above.
        serialized(|| unsafe {
            (self.permutation)(maneuver.as_ptr(), buf.as_mut_ptr().cast());
        });
        read_buffer(&buf)
    }

    fn solve(&self, src: &str, best: bool) -> RawSolveResult {
        let src = c_string(src);
        let mut buf = [0u8; CUBE_BS];
        // SAFETY: as above.
        let rc = serialized(|| unsafe {
            (self.solve)(src.as_ptr(), buf.as_mut_ptr().cast(), c_int::from(best))
        });
        RawSolveResult {
            status: StatusTag::new(rc),
            solution: read_buffer(&buf),
        }
    }

    fn solve_ultimate(&self, src: &str, tgt: &str, step: u32, best: bool) -> RawSolveResult {
        let src = c_string(src);
        let tgt = c_string(tgt);
        let step = c_int::try_from(step).unwrap_or(c_int::MAX);
        let mut buf = [0u8; CUBE_BS];
        // SAFETY: as above.
        let rc = serialized(|| unsafe {
            (self.solve_ultimate)(
                src.as_ptr(),
                tgt.as_ptr(),
                buf.as_mut_ptr().cast(),
                step,
                c_int::from(best),
                FORMATTED,
            )
        });
        RawSolveResult {
            status: StatusTag::new(rc),
            solution: read_buffer(&buf),
        }
    }
}

// ---------------------------------------------------------------------------
// Library discovery
// ---------------------------------------------------------------------------

/// Platform-specific file name for a library base name.
pub fn platform_lib_name(name: &str) -> String {
    #[cfg(target_os = "windows")]
    {
        format!("{}.dll", name)
    }
    #[cfg(target_os = "macos")]
    {
        format!("lib{}.dylib", name)
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        format!("lib{}.so", name)
    }
}

/// Find the engine library.
///
/// An explicit `library_path` must exist. Otherwise the configured search
/// directories, the executable's directory and the current directory are
/// tried in order; failing those, the bare file name is left to the system
/// loader.
pub fn resolve_library(config: &EngineConfig) -> LoadResult<PathBuf> {
    if let Some(path) = &config.library_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    let file_name = platform_lib_name(&config.library_name);
    let mut dirs = config.search_dirs.clone();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    for dir in dirs {
        let candidate = dir.join(&file_name);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "engine library found");
            return Ok(candidate);
        }
    }

    tracing::debug!(file = %file_name, "engine library not in search dirs, deferring to system loader");
    Ok(PathBuf::from(file_name))
}

// ---------------------------------------------------------------------------
// C string helpers
// ---------------------------------------------------------------------------

/// Everything up to the first NUL, which is all the C side would see.
fn c_string(s: &str) -> CString {
    let bytes = s.as_bytes();
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    CString::new(&bytes[..end]).unwrap_or_default()
}

fn read_buffer(buf: &[u8]) -> String {
    match CStr::from_bytes_until_nul(buf) {
        Ok(s) => s.to_string_lossy().into_owned(),
        Err(_) => String::from_utf8_lossy(buf).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_lib_name() {
        let name = platform_lib_name("cube");
        #[cfg(target_os = "windows")]
        assert_eq!(name, "cube.dll");
        #[cfg(target_os = "macos")]
        assert_eq!(name, "libcube.dylib");
        #[cfg(target_os = "linux")]
        assert_eq!(name, "libcube.so");
    }

    #[test]
    fn test_c_string_truncates_at_nul() {
        assert_eq!(c_string("R U").as_bytes(), b"R U");
        assert_eq!(c_string("R\0U").as_bytes(), b"R");
        assert_eq!(c_string("").as_bytes(), b"");
    }

    #[test]
    fn test_read_buffer_stops_at_nul() {
        let mut buf = [0u8; CUBE_BS];
        buf[..5].copy_from_slice(b"R U2 ");
        assert_eq!(read_buffer(&buf), "R U2 ");
        assert_eq!(read_buffer(&[0u8; 4]), "");
        assert_eq!(read_buffer(b"full"), "full");
    }

    #[test]
    fn test_resolve_missing_explicit_path() {
        let config = EngineConfig {
            library_path: Some(PathBuf::from("/nonexistent/libcube.so")),
            ..EngineConfig::default()
        };
        match resolve_library(&config) {
            Err(LoadError::NotFound(p)) => assert!(p.contains("nonexistent")),
            other => panic!("expected NotFound, got {:?}", other.map(|p| p.display().to_string())),
        }
    }

    #[test]
    fn test_resolve_from_search_dir() {
        let dir = std::env::temp_dir().join("cube_resolve_test");
        std::fs::create_dir_all(&dir).unwrap();
        let lib = dir.join(platform_lib_name("cube_resolve_fixture"));
        std::fs::write(&lib, b"not really a library").unwrap();

        let config = EngineConfig {
            library_name: "cube_resolve_fixture".into(),
            search_dirs: vec![dir.clone()],
            ..EngineConfig::default()
        };
        assert_eq!(resolve_library(&config).unwrap(), lib);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_resolve_falls_back_to_bare_name() {
        let config = EngineConfig {
            library_name: "cube_no_such_engine".into(),
            ..EngineConfig::default()
        };
        assert_eq!(
            resolve_library(&config).unwrap(),
            PathBuf::from(platform_lib_name("cube_no_such_engine"))
        );
    }

    #[test]
    fn test_load_missing_library_fails() {
        let result = NativeEngine::load("/nonexistent/libcube_missing.so");
        assert!(matches!(result, Err(LoadError::Library { .. })));
    }

    // -----------------------------------------------------------------------
    // In-process stand-ins for the engine's exports
    // -----------------------------------------------------------------------

    #[cfg(unix)]
    mod stub {
        use super::super::*;
        use crate::types::CUBE_ID;
        use serial_test::serial;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use std::time::Duration;

        static SOLVABLE_CALLS: AtomicUsize = AtomicUsize::new(0);
        static FACECUBE_CALLS: AtomicUsize = AtomicUsize::new(0);
        static PERMUTATION_CALLS: AtomicUsize = AtomicUsize::new(0);
        static IN_FLIGHT: AtomicUsize = AtomicUsize::new(0);
        static MAX_IN_FLIGHT: AtomicUsize = AtomicUsize::new(0);

        unsafe extern "C" fn solvable(_: *const c_char) -> c_int {
            SOLVABLE_CALLS.fetch_add(1, Ordering::SeqCst);
            1
        }

        /// Echoes the input cube.
        unsafe extern "C" fn facecube(cube: *const c_char, _: *const c_char, buf: *mut c_char) {
            FACECUBE_CALLS.fetch_add(1, Ordering::SeqCst);
            let src = CStr::from_ptr(cube).to_bytes();
            std::ptr::copy_nonoverlapping(src.as_ptr().cast::<c_char>(), buf, src.len());
            *buf.add(src.len()) = 0;
        }

        unsafe extern "C" fn permutation(_: *const c_char, buf: *mut c_char) {
            PERMUTATION_CALLS.fetch_add(1, Ordering::SeqCst);
            *buf = 0;
        }

        unsafe extern "C" fn solve(_: *const c_char, buf: *mut c_char, _: c_int) -> c_int {
            *buf = 0;
            0
        }

        /// Reports UNKNOWN_ERR when another call is already inside.
        unsafe extern "C" fn solve_ultimate(
            _: *const c_char,
            _: *const c_char,
            buf: *mut c_char,
            _: c_int,
            _: c_int,
            _: c_int,
        ) -> c_int {
            let inside = IN_FLIGHT.fetch_add(1, Ordering::SeqCst) + 1;
            MAX_IN_FLIGHT.fetch_max(inside, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            IN_FLIGHT.fetch_sub(1, Ordering::SeqCst);
            *buf = 0;
            if inside > 1 {
                5
            } else {
                0
            }
        }

        fn stub_engine() -> NativeEngine {
            NativeEngine {
                solve_ultimate,
                solve,
                solvable,
                facecube,
                permutation,
                path: "<stub>".to_string(),
                _library: libloading::os::unix::Library::this().into(),
            }
        }

        fn assert_send_sync<T: Send + Sync>() {}

        #[test]
        fn test_native_engine_is_send_sync() {
            assert_send_sync::<NativeEngine>();
        }

        #[test]
        #[serial]
        fn test_concurrent_calls_never_overlap() {
            MAX_IN_FLIGHT.store(0, Ordering::SeqCst);
            let shared = Arc::new(stub_engine());

            // Two threads share one engine; two load their own.
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let shared = shared.clone();
                    std::thread::spawn(move || {
                        let engine = if i % 2 == 0 {
                            shared
                        } else {
                            Arc::new(stub_engine())
                        };
                        engine.solve_ultimate(CUBE_ID, CUBE_ID, 30, true).status
                    })
                })
                .collect();

            let statuses: Vec<StatusTag> =
                handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert_eq!(statuses, vec![StatusTag::new(0); 4]);
            assert_eq!(MAX_IN_FLIGHT.load(Ordering::SeqCst), 1);
        }

        #[test]
        #[serial]
        fn test_malformed_cube_never_reaches_engine() {
            let engine = stub_engine();
            SOLVABLE_CALLS.store(0, Ordering::SeqCst);
            FACECUBE_CALLS.store(0, Ordering::SeqCst);

            assert!(!engine.solvable("UUU"));
            assert!(!engine.solvable(&CUBE_ID.replace('B', "X")));
            assert_eq!(engine.facecube("R", "UUU"), "");
            assert_eq!(SOLVABLE_CALLS.load(Ordering::SeqCst), 0);
            assert_eq!(FACECUBE_CALLS.load(Ordering::SeqCst), 0);

            assert!(engine.solvable(CUBE_ID));
            assert_eq!(engine.facecube("R", CUBE_ID), CUBE_ID);
            assert_eq!(SOLVABLE_CALLS.load(Ordering::SeqCst), 1);
            assert_eq!(FACECUBE_CALLS.load(Ordering::SeqCst), 1);
        }

        #[test]
        #[serial]
        fn test_overflowing_repeat_count_never_reaches_engine() {
            let engine = stub_engine();
            PERMUTATION_CALLS.store(0, Ordering::SeqCst);
            FACECUBE_CALLS.store(0, Ordering::SeqCst);

            assert_eq!(engine.permutation("(U){99999999999}"), "");
            assert_eq!(engine.facecube("(U){99999999999}", CUBE_ID), "");
            assert_eq!(PERMUTATION_CALLS.load(Ordering::SeqCst), 0);
            assert_eq!(FACECUBE_CALLS.load(Ordering::SeqCst), 0);

            engine.permutation("(U){4}");
            assert_eq!(PERMUTATION_CALLS.load(Ordering::SeqCst), 1);
        }
    }
}
