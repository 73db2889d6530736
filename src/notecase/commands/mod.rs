//! # Lifecycle Commands
//!
//! Every state change of the organizer is one of these functions. They take the
//! store explicitly, operate on Rust types, and return a [`CmdResult`]; none of
//! them touch the terminal.
//!
//! The commands are generic over [`crate::store::Stored`], so notes and cards
//! share a single implementation of each transition:
//!
//! ```text
//!            create                delete
//!   draft ───────────▶ active ───────────▶ trashed ──── purge ───▶ (gone)
//!                        ▲                    │
//!                        └────── restore ─────┘
//! ```
//!
//! `update` and the tagging commands edit an item in place inside the active
//! collection. Lookups are linear scans by id, and an id that is not where the
//! command expects it makes the command a no-op rather than an error.

use crate::config::NotecaseConfig;
use crate::index::DisplayItem;
use crate::model::{AnyItem, Card, ItemKind, Note};

pub mod config;
pub mod create;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod purge;
pub mod restore;
pub mod tagging;
pub mod update;
pub mod view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_items: Vec<AnyItem>,
    pub listed_notes: Vec<DisplayItem<Note>>,
    pub listed_cards: Vec<DisplayItem<Card>>,
    pub messages: Vec<CmdMessage>,
    /// Set when an item was moved to the trash; drives the deletion toast.
    pub deleted: Option<ItemKind>,
    pub config: Option<NotecaseConfig>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_notes(mut self, notes: Vec<DisplayItem<Note>>) -> Self {
        self.listed_notes = notes;
        self
    }

    pub fn with_listed_cards(mut self, cards: Vec<DisplayItem<Card>>) -> Self {
        self.listed_cards = cards;
        self
    }

    pub fn with_config(mut self, config: NotecaseConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Folds another result into this one, keeping the latest deletion signal.
    pub fn merge(&mut self, other: CmdResult) {
        self.affected_items.extend(other.affected_items);
        self.listed_notes.extend(other.listed_notes);
        self.listed_cards.extend(other.listed_cards);
        self.messages.extend(other.messages);
        if other.deleted.is_some() {
            self.deleted = other.deleted;
        }
    }

    pub fn is_noop(&self) -> bool {
        self.affected_items.is_empty()
    }
}
