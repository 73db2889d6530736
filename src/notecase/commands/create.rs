use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ItemId;
use crate::store::{ItemStore, Location, Stored};
use chrono::Utc;
use log::info;

pub fn run<T: Stored>(store: &mut ItemStore, draft: T::Draft) -> Result<CmdResult> {
    let item = T::from_draft(ItemId::new(), draft, Utc::now());
    item.validate()?;

    info!("created {} {}", T::KIND, item.id().short());
    store.shelf_mut::<T>().push(Location::Active, item.clone());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} created: {}",
        T::KIND.label(),
        item.title()
    )));
    result.affected_items.push(item.into_any());
    Ok(result)
}
