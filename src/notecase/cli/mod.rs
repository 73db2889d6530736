//! # Client Behavior
//!
//! This is **one possible client** for notecase, not the application itself.
//! It is the only place that knows about terminal I/O and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in `notecase`.
//!
//! ## A Session, Not a Command
//!
//! `notecase` starts an interactive session. Each line typed is one command
//! (`note`, `card`, `list`, `delete note 1`, ...) parsed with the same clap
//! machinery a one-shot CLI would use. The collection lives only as long as
//! the session; piping a script into stdin runs it top to bottom.
//!
//! ### The Deletion Notice
//!
//! Deleting an item shows `Deleted Note` / `Deleted Card` until the configured
//! duration passes or `dismiss` is typed. The notice heads the `list` output
//! while it is visible.
//!
//! ### Link Previews
//!
//! Link cards ask the preview service for a title and image in the background.
//! The session keeps reading commands meanwhile; `previews` waits for every
//! pending fetch. Without `$NOTECASE_PREVIEW_KEY` every link shows
//! "No preview available".
//!
//! ## Module Structure
//!
//! - `commands`: The session loop and per-command handlers
//! - `render`: Output formatting (lists, full views, messages)
//! - `setup`: Argument parsing via clap, help text
//! - `styles`: Terminal styling constants

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
