use crate::error::{NotecaseError, Result};
use crate::index::DisplayIndex;
use crate::model::ItemId;
use crate::store::{ItemStore, Location, Stored};

/// Maps display indexes to the ids of the items currently shown at them.
pub fn resolve_indexes<T: Stored>(
    store: &ItemStore,
    indexes: &[DisplayIndex],
) -> Result<Vec<(DisplayIndex, ItemId)>> {
    indexes
        .iter()
        .map(|idx| {
            let items = store.items::<T>(idx.location());
            idx.offset()
                .and_then(|offset| items.get(offset))
                .map(|item| (*idx, item.id()))
                .ok_or_else(|| {
                    NotecaseError::Api(format!("{} index {} not found", T::KIND.label(), idx))
                })
        })
        .collect()
}

/// Inverse of [`resolve_indexes`] for a single id.
pub fn display_index_of<T: Stored>(store: &ItemStore, id: ItemId) -> Option<DisplayIndex> {
    let shelf = store.shelf::<T>();
    let location = shelf.locate(id)?;
    let position = shelf.position(location, id)?;
    let idx = match location {
        Location::Active => DisplayIndex::Active(position + 1),
        Location::Trashed => DisplayIndex::Trashed(position + 1),
    };
    Some(idx)
}
