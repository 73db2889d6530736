//! # Notecase Client
//!
//! The binary is intentionally thin: the client lives in `cli/`, while this
//! file only starts the Tokio runtime, invokes `cli::run()` and handles
//! process termination.
//!
//! Everything from `api.rs` inward is UI agnostic. The client is responsible
//! for **all** user-facing concerns: argument parsing, the session loop,
//! error reporting and rendering.
//!
//! ## Testing Approach
//!
//! - **Library (`commands/`, `api.rs`)**: unit tests next to the code.
//! - **Client (`cli/`)**: rendering and line parsing are pure functions with
//!   their own tests; `tests/session.rs` pipes whole sessions through the binary.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
