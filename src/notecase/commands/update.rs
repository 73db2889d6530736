use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{ItemStore, Location, Stored};
use chrono::Utc;
use log::{debug, info};

/// Replaces the active item carrying `edited.id()` with a revised copy.
///
/// The stored item decides what may change (see [`crate::model::Item::revise`]); `date` is
/// always refreshed. Items that are not active are left alone.
pub fn run<T: Stored>(store: &mut ItemStore, edited: T) -> Result<CmdResult> {
    let id = edited.id();
    let shelf = store.shelf_mut::<T>();
    let Some(position) = shelf.position(Location::Active, id) else {
        debug!("update skipped: {} {} is not active", T::KIND, id.short());
        return Ok(CmdResult::default());
    };

    let revised = shelf.items(Location::Active)[position].revise(edited, Utc::now());
    revised.validate()?;

    info!("updated {} {}", T::KIND, id.short());
    shelf.replace(Location::Active, position, revised.clone());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} updated: {}",
        T::KIND.label(),
        revised.title()
    )));
    result.affected_items.push(revised.into_any());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, CardDraft, CardType, Note};
    use crate::store::fixtures::StoreFixture;

    #[test]
    fn replaces_in_place_and_refreshes_date() {
        let mut fx = StoreFixture::new().with_notes(3);
        let mut edited = fx.store.items::<Note>(Location::Active)[1].clone();
        let old_date = edited.date;
        edited.content = "rewritten".into();

        run(&mut fx.store, edited.clone()).unwrap();

        let notes = fx.store.items::<Note>(Location::Active);
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[1].id, edited.id);
        assert_eq!(notes[1].content, "rewritten");
        assert!(notes[1].date >= old_date);
        assert_eq!(notes[0].title, "Note 1");
        assert_eq!(notes[2].title, "Note 3");
    }

    #[test]
    fn unknown_id_is_a_silent_noop() {
        let mut fx = StoreFixture::new().with_notes(1);
        let mut stranger = fx.store.items::<Note>(Location::Active)[0].clone();
        stranger.id = crate::model::ItemId::new();
        stranger.title = "Changed".into();

        let result = run(&mut fx.store, stranger).unwrap();
        assert!(result.is_noop());
        assert!(result.messages.is_empty());
        assert_eq!(fx.store.items::<Note>(Location::Active)[0].title, "Note 1");
    }

    #[test]
    fn trashed_items_are_not_updated() {
        let mut fx = StoreFixture::new().with_note("Old", Location::Trashed);
        let mut edited = fx.store.items::<Note>(Location::Trashed)[0].clone();
        edited.title = "New".into();

        assert!(run(&mut fx.store, edited).unwrap().is_noop());
        assert_eq!(fx.store.items::<Note>(Location::Trashed)[0].title, "Old");
    }

    #[test]
    fn card_type_survives_edits() {
        let mut fx =
            StoreFixture::new().with_card(CardDraft::text("Plain", "words"), Location::Active);
        let mut edited = fx.store.items::<Card>(Location::Active)[0].clone();
        edited.card_type = CardType::Link;
        edited.content = "more words".into();

        run(&mut fx.store, edited).unwrap();
        let card = &fx.store.items::<Card>(Location::Active)[0];
        assert_eq!(card.card_type, CardType::Text);
        assert_eq!(card.content, "more words");
        assert_eq!(card.image_url, None);
    }

    #[test]
    fn invalid_edit_keeps_the_stored_item() {
        let mut fx = StoreFixture::new().with_notes(1);
        let mut edited = fx.store.items::<Note>(Location::Active)[0].clone();
        edited.title = String::new();

        assert!(run(&mut fx.store, edited).is_err());
        assert_eq!(fx.store.items::<Note>(Location::Active)[0].title, "Note 1");
    }
}
