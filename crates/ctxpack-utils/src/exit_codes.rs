//! Exit code constants for ctxpack.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Run completed (per-file read errors included) |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `PRECONDITION` | Root directory missing, path list missing or not UTF-8 |
//! | 4 | `OUTPUT_IO` | Output artifact could not be created or written |

/// Exit codes matching the documented exit code table.
///
/// The numeric values are part of the public API and will not change in
/// 1.x releases.
///
/// # Example
///
/// ```rust
/// use ctxpack_utils::exit_codes::ExitCode;
///
/// let code = ExitCode::PRECONDITION;
/// assert_eq!(code.as_i32(), 3);
/// assert_eq!(ExitCode::SUCCESS, ExitCode::from_i32(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - run completed, possibly with per-file diagnostics
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Precondition failed - root directory missing, path list missing or not UTF-8
    pub const PRECONDITION: ExitCode = ExitCode(3);

    /// Output I/O - an output artifact could not be opened or written
    pub const OUTPUT_IO: ExitCode = ExitCode(4);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
