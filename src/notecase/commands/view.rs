use crate::index::{DisplayIndex, DisplayItem};
use crate::model::ItemId;
use crate::store::{ItemStore, Stored};

/// Looks up resolved items for full display, in the order they were asked for.
pub fn items<T: Stored>(store: &ItemStore, resolved: &[(DisplayIndex, ItemId)]) -> Vec<DisplayItem<T>> {
    resolved
        .iter()
        .filter_map(|(index, id)| {
            store.get::<T>(index.location(), *id).map(|item| DisplayItem {
                index: *index,
                item: item.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::resolve_indexes;
    use crate::model::Note;
    use crate::store::fixtures::StoreFixture;
    use crate::store::Location;

    #[test]
    fn keeps_requested_order() {
        let fx = StoreFixture::new()
            .with_notes(3)
            .with_note("Old", Location::Trashed);
        let resolved = resolve_indexes::<Note>(
            &fx.store,
            &[
                DisplayIndex::Trashed(1),
                DisplayIndex::Active(3),
                DisplayIndex::Active(1),
            ],
        )
        .unwrap();

        let shown = items::<Note>(&fx.store, &resolved);
        let titles: Vec<&str> = shown.iter().map(|d| d.item.title.as_str()).collect();
        assert_eq!(titles, vec!["Old", "Note 3", "Note 1"]);
        assert_eq!(shown[0].index, DisplayIndex::Trashed(1));
    }
}
