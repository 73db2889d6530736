//! # Notecase Architecture
//!
//! Notecase is a personal organizer for two kinds of items: **notes** (titled
//! rich text with tags) and **cards** (short text snippets or links). Every
//! item lives in the active collection or in the trash, and moves between them
//! through one lifecycle shared by both kinds. The whole session is in memory.
//!
//! Like the rest of the codebase, notecase is a library that happens to have a
//! terminal client, not the other way around.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client Layer (cli/, wired by main.rs)                      │
//! │  - Interactive command loop, rendering, terminal I/O        │
//! │  - The ONLY place that knows about stdout/stderr            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (display indexes → ids)                │
//! │  - Owns session state: toast, selection, preview cache      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - create / update / delete / restore / purge, tags         │
//! │  - Generic over the item kind, returns `CmdResult`          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store.rs)                                           │
//! │  - Active and trashed sequences per kind                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Side services sit next to the API: the deletion toast ([`toast`]) runs its
//! hide timer on Tokio, and link previews ([`preview`]) are fetched from an
//! external HTTP service in background tasks. Neither can fail a lifecycle
//! operation.
//!
//! ## No I/O in the Core
//!
//! From `api.rs` inward, code takes Rust arguments, returns `Result<CmdResult>`,
//! and never writes to the terminal. The only outbound I/O is the preview
//! request and the configuration file.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: the bulk of the unit tests, run against `StoreFixture`.
//! 2. **API**: index resolution, toast, selection and preview bookkeeping,
//!    with a fake preview service and paused Tokio time.
//! 3. **Client**: rendering functions return strings and are tested directly;
//!    `tests/` drives the binary end to end.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Lifecycle logic for each command
//! - [`store`]: The in-memory item store
//! - [`model`]: Notes, cards, drafts and the `Item` trait
//! - [`index`]: Display indexing (`1`, `t1`, ranges)
//! - [`toast`]: The deletion notification
//! - [`preview`]: Link preview service and fetch tasks
//! - [`config`]: Configuration management
//! - [`editor`]: External editor integration
//! - [`text`]: Rich text flattening and accent cycling
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod index;
pub mod model;
pub mod preview;
pub mod store;
pub mod text;
pub mod toast;
