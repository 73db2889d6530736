use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ItemId;
use crate::store::{ItemStore, Location, Stored};
use log::{debug, info};

/// Moves a trashed item back to the end of the active collection.
pub fn run<T: Stored>(store: &mut ItemStore, id: ItemId) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let shelf = store.shelf_mut::<T>();

    match shelf.transfer(id, Location::Trashed, Location::Active) {
        Some(item) => {
            info!("restored {} {}", T::KIND, id.short());
            result.add_message(CmdMessage::success(format!(
                "{} restored: {}",
                T::KIND.label(),
                item.title()
            )));
            result.affected_items.push(item.clone().into_any());
        }
        None => debug!("restore skipped: {} {} is not in trash", T::KIND, id.short()),
    }

    Ok(result)
}
