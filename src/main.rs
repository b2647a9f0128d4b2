//! ctxpack CLI binary
//!
//! Minimal entrypoint: all logic is in the library, main.rs only invokes
//! `cli::run()` and maps its result to the process exit code.

fn main() {
    // cli::run() handles ALL output including errors
    if let Err(code) = ctxpack::cli::run() {
        std::process::exit(code.as_i32());
    }
}
