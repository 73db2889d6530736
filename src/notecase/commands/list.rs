use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::{index_items, DisplayItem};
use crate::model::{Card, Note};
use crate::store::{ItemStore, Location, Stored};

pub fn items<T: Stored>(store: &ItemStore, location: Location) -> Vec<DisplayItem<T>> {
    index_items(store.items::<T>(location), location)
}

/// Lists both kinds at `location`, notes first.
pub fn run(store: &ItemStore, location: Location) -> Result<CmdResult> {
    Ok(CmdResult::default()
        .with_listed_notes(items::<Note>(store, location))
        .with_listed_cards(items::<Card>(store, location)))
}
