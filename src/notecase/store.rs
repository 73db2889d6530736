//! # Item Store
//!
//! The store is the single source of truth for a session: four ordered
//! collections (active notes, active cards, trashed notes, trashed cards).
//!
//! ## Layout
//!
//! Each kind gets a [`Shelf`], an active/trashed pair of vectors. [`ItemStore`]
//! holds one shelf per kind and the [`Stored`] trait lets generic code pick the
//! right shelf from the item type alone:
//!
//! ```text
//! ItemStore
//! ├── notes: Shelf<Note>   { active: [..], trashed: [..] }
//! └── cards: Shelf<Card>   { active: [..], trashed: [..] }
//! ```
//!
//! ## Access Rules
//!
//! Reads are public. Every mutation is `pub(crate)` and only the lifecycle
//! commands in `commands/` call them, so invariants are enforced in one place:
//! - an item lives in exactly one of {active, trashed} for its kind
//! - ids are unique across both collections of a kind
//! - sequences keep insertion/operation order, never re-sorted by date or id
//!
//! Nothing is persisted; the store lives as long as the session that owns it.

use crate::model::{Card, Item, ItemId, Note};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Active,
    Trashed,
}

/// The active and trashed collections of one item kind.
#[derive(Debug, Clone)]
pub struct Shelf<T> {
    active: Vec<T>,
    trashed: Vec<T>,
}

impl<T> Default for Shelf<T> {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            trashed: Vec::new(),
        }
    }
}

impl<T: Item> Shelf<T> {
    pub fn items(&self, location: Location) -> &[T] {
        match location {
            Location::Active => &self.active,
            Location::Trashed => &self.trashed,
        }
    }

    fn items_mut(&mut self, location: Location) -> &mut Vec<T> {
        match location {
            Location::Active => &mut self.active,
            Location::Trashed => &mut self.trashed,
        }
    }

    pub fn position(&self, location: Location, id: ItemId) -> Option<usize> {
        self.items(location).iter().position(|item| item.id() == id)
    }

    pub fn get(&self, location: Location, id: ItemId) -> Option<&T> {
        self.items(location).iter().find(|item| item.id() == id)
    }

    /// Where an item currently lives, if anywhere.
    pub fn locate(&self, id: ItemId) -> Option<Location> {
        [Location::Active, Location::Trashed]
            .into_iter()
            .find(|loc| self.position(*loc, id).is_some())
    }

    pub fn len(&self, location: Location) -> usize {
        self.items(location).len()
    }

    pub fn is_empty(&self, location: Location) -> bool {
        self.items(location).is_empty()
    }

    pub(crate) fn push(&mut self, location: Location, item: T) {
        self.items_mut(location).push(item);
    }

    pub(crate) fn replace(&mut self, location: Location, index: usize, item: T) {
        self.items_mut(location)[index] = item;
    }

    /// Removes an item, keeping the order of the others.
    pub(crate) fn take(&mut self, location: Location, id: ItemId) -> Option<T> {
        let index = self.position(location, id)?;
        Some(self.items_mut(location).remove(index))
    }

    /// Moves an item to the end of the other collection in one step.
    pub(crate) fn transfer(&mut self, id: ItemId, from: Location, to: Location) -> Option<&T> {
        let item = self.take(from, id)?;
        let target = self.items_mut(to);
        target.push(item);
        target.last()
    }

    pub(crate) fn clear(&mut self, location: Location) -> Vec<T> {
        std::mem::take(self.items_mut(location))
    }
}

/// Items that have a shelf in the [`ItemStore`].
pub trait Stored: Item {
    fn shelf(store: &ItemStore) -> &Shelf<Self>;
    fn shelf_mut(store: &mut ItemStore) -> &mut Shelf<Self>;
}

impl Stored for Note {
    fn shelf(store: &ItemStore) -> &Shelf<Self> {
        &store.notes
    }

    fn shelf_mut(store: &mut ItemStore) -> &mut Shelf<Self> {
        &mut store.notes
    }
}

impl Stored for Card {
    fn shelf(store: &ItemStore) -> &Shelf<Self> {
        &store.cards
    }

    fn shelf_mut(store: &mut ItemStore) -> &mut Shelf<Self> {
        &mut store.cards
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    notes: Shelf<Note>,
    cards: Shelf<Card>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shelf<T: Stored>(&self) -> &Shelf<T> {
        T::shelf(self)
    }

    pub(crate) fn shelf_mut<T: Stored>(&mut self) -> &mut Shelf<T> {
        T::shelf_mut(self)
    }

    pub fn items<T: Stored>(&self, location: Location) -> &[T] {
        self.shelf::<T>().items(location)
    }

    pub fn get<T: Stored>(&self, location: Location, id: ItemId) -> Option<&T> {
        self.shelf::<T>().get(location, id)
    }

    /// True when neither kind has anything in `location`.
    pub fn is_empty(&self, location: Location) -> bool {
        self.notes.is_empty(location) && self.cards.is_empty(location)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{CardDraft, NoteDraft};
    use chrono::Utc;

    pub struct StoreFixture {
        pub store: ItemStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: ItemStore::new(),
            }
        }

        pub fn with_notes(mut self, count: usize) -> Self {
            for i in 0..count {
                let draft = NoteDraft::new(format!("Note {}", i + 1), format!("Body {}", i + 1));
                self.store
                    .shelf_mut::<Note>()
                    .push(Location::Active, Note::from_draft(ItemId::new(), draft, Utc::now()));
            }
            self
        }

        pub fn with_note(mut self, title: &str, location: Location) -> Self {
            let draft = NoteDraft::new(title, "Some content");
            self.store
                .shelf_mut::<Note>()
                .push(location, Note::from_draft(ItemId::new(), draft, Utc::now()));
            self
        }

        pub fn with_card(mut self, draft: CardDraft, location: Location) -> Self {
            self.store
                .shelf_mut::<Card>()
                .push(location, Card::from_draft(ItemId::new(), draft, Utc::now()));
            self
        }

        pub fn note_id(&self, location: Location, index: usize) -> ItemId {
            self.store.items::<Note>(location)[index].id
        }

        pub fn card_id(&self, location: Location, index: usize) -> ItemId {
            self.store.items::<Card>(location)[index].id
        }
    }
}
