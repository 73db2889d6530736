use crate::commands::{update, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{ItemId, Note};
use crate::store::{ItemStore, Location};
use log::debug;

/// Adds tags to an active note, skipping ones it already carries.
pub fn add_tags<S: AsRef<str>>(store: &mut ItemStore, id: ItemId, tags: &[S]) -> Result<CmdResult> {
    edit_tags(store, id, tags, true)
}

/// Removes tags from an active note.
pub fn remove_tags<S: AsRef<str>>(
    store: &mut ItemStore,
    id: ItemId,
    tags: &[S],
) -> Result<CmdResult> {
    edit_tags(store, id, tags, false)
}

fn edit_tags<S: AsRef<str>>(
    store: &mut ItemStore,
    id: ItemId,
    tags: &[S],
    adding: bool,
) -> Result<CmdResult> {
    let Some(note) = store.get::<Note>(Location::Active, id) else {
        debug!("tag edit skipped: note {} is not active", id.short());
        return Ok(CmdResult::default());
    };

    let mut edited = note.clone();
    let mut changed = Vec::new();
    let mut unchanged = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        let applied = if adding {
            edited.tags.insert(tag)
        } else {
            edited.tags.remove(tag)
        };
        if applied {
            changed.push(tag.to_string());
        } else if !tag.is_empty() {
            unchanged.push(tag.to_string());
        }
    }

    let mut result = if changed.is_empty() {
        CmdResult::default()
    } else {
        let mut result = update::run(store, edited)?;
        // The generic update message says less than we know here.
        result.messages.clear();
        let verb = if adding { "Tagged" } else { "Untagged" };
        result.add_message(CmdMessage::success(format!(
            "{} '{}': {}",
            verb,
            note_title(store, id),
            changed.join(", ")
        )));
        result
    };

    if !unchanged.is_empty() {
        let reason = if adding {
            "already present"
        } else {
            "not present"
        };
        result.add_message(CmdMessage::info(format!(
            "Skipped ({}): {}",
            reason,
            unchanged.join(", ")
        )));
    }

    Ok(result)
}

fn note_title(store: &ItemStore, id: ItemId) -> String {
    store
        .get::<Note>(Location::Active, id)
        .map(|n| n.title.clone())
        .unwrap_or_default()
}
