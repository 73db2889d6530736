use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ItemId;
use crate::store::{ItemStore, Location, Stored};
use log::{debug, info};

/// Moves an active item to the end of the trash.
pub fn run<T: Stored>(store: &mut ItemStore, id: ItemId) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let shelf = store.shelf_mut::<T>();

    match shelf.transfer(id, Location::Active, Location::Trashed) {
        Some(item) => {
            info!("moved {} {} to trash", T::KIND, id.short());
            result.add_message(CmdMessage::success(format!(
                "{} moved to trash: {}",
                T::KIND.label(),
                item.title()
            )));
            result.affected_items.push(item.clone().into_any());
            result.deleted = Some(T::KIND);
        }
        None => debug!("delete skipped: {} {} is not active", T::KIND, id.short()),
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, restore};
    use crate::model::{Card, CardDraft, ItemKind, Note, NoteDraft};
    use crate::store::fixtures::StoreFixture;

    #[test]
    fn moves_note_to_trash_and_signals() {
        let mut store = ItemStore::new();
        let created = create::run::<Note>(&mut store, NoteDraft::new("Groceries", "milk, eggs"))
            .unwrap();
        let id = created.affected_items[0].id();

        let result = run::<Note>(&mut store, id).unwrap();

        assert_eq!(result.deleted, Some(ItemKind::Note));
        assert!(store.items::<Note>(Location::Active).is_empty());
        let trashed = store.items::<Note>(Location::Trashed);
        assert_eq!(trashed.len(), 1);
        assert_eq!(trashed[0].id, id);

        restore::run::<Note>(&mut store, id).unwrap();
        assert_eq!(store.items::<Note>(Location::Active)[0].id, id);
        assert!(store.items::<Note>(Location::Trashed).is_empty());
    }

    #[test]
    fn deleting_twice_equals_deleting_once() {
        let mut fx = StoreFixture::new()
            .with_card(CardDraft::text("A", "a"), Location::Active)
            .with_card(CardDraft::text("B", "b"), Location::Active);
        let id = fx.card_id(Location::Active, 0);

        run::<Card>(&mut fx.store, id).unwrap();
        let once = fx.store.clone();
        let second = run::<Card>(&mut fx.store, id).unwrap();

        assert!(second.is_noop());
        assert_eq!(second.deleted, None);
        assert_eq!(
            once.items::<Card>(Location::Active),
            fx.store.items::<Card>(Location::Active)
        );
        assert_eq!(
            once.items::<Card>(Location::Trashed),
            fx.store.items::<Card>(Location::Trashed)
        );
    }

    #[test]
    fn trash_keeps_deletion_order() {
        let mut fx = StoreFixture::new().with_notes(3);
        let third = fx.note_id(Location::Active, 2);
        let first = fx.note_id(Location::Active, 0);

        run::<Note>(&mut fx.store, third).unwrap();
        run::<Note>(&mut fx.store, first).unwrap();

        let trashed: Vec<_> = fx
            .store
            .items::<Note>(Location::Trashed)
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(trashed, vec![third, first]);
        assert_eq!(fx.store.items::<Note>(Location::Active)[0].title, "Note 2");
    }
}
