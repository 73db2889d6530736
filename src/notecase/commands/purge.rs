use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Card, Item, ItemId, Note};
use crate::store::{ItemStore, Location, Stored};
use log::{debug, info};

/// Removes a trashed item for good.
pub fn run<T: Stored>(store: &mut ItemStore, id: ItemId) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    match store.shelf_mut::<T>().take(Location::Trashed, id) {
        Some(item) => {
            info!("purged {} {}", T::KIND, id.short());
            result.add_message(CmdMessage::success(format!(
                "Purged {}: {}",
                T::KIND,
                item.title()
            )));
            result.affected_items.push(item.into_any());
        }
        None => debug!("purge skipped: {} {} is not in trash", T::KIND, id.short()),
    }

    Ok(result)
}

/// Purges every trashed note and card.
pub fn empty_trash(store: &mut ItemStore) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let notes = store.shelf_mut::<Note>().clear(Location::Trashed);
    let cards = store.shelf_mut::<Card>().clear(Location::Trashed);

    if notes.is_empty() && cards.is_empty() {
        result.add_message(CmdMessage::info("Trash is already empty."));
        return Ok(result);
    }

    info!(
        "emptied trash: {} notes, {} cards",
        notes.len(),
        cards.len()
    );
    result.add_message(CmdMessage::success(format!(
        "Purged {} notes and {} cards.",
        notes.len(),
        cards.len()
    )));
    result
        .affected_items
        .extend(notes.into_iter().map(Item::into_any));
    result
        .affected_items
        .extend(cards.into_iter().map(Item::into_any));
    Ok(result)
}
