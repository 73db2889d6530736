//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for every notecase operation, whatever the client.
//!
//! The facade:
//! - **Dispatches** to the lifecycle commands in `commands/*.rs`
//! - **Normalizes inputs**: display indexes such as `2` or `t1-t3` become ids
//! - **Owns session state** the commands do not know about: the deletion toast,
//!   the selected note and the link preview cache
//!
//! It never prints and never formats; results come back as [`CmdResult`]s.
//!
//! ## Previews
//!
//! `NotecaseApi<F: PreviewFetcher>` is generic over the preview service.
//! Creating, editing or restoring a link card starts background fetches whose
//! [`PreviewOutcome`]s arrive on the channel handed out by
//! [`NotecaseApi::take_preview_receiver`]. The client feeds them back through
//! [`NotecaseApi::apply_preview`], which drops outcomes for cards that were
//! deleted or re-pointed in the meantime.
//!
//! The toast timer and background fetches are Tokio tasks. Without a runtime
//! the toast stays up until dismissed and link previews are marked
//! unavailable; no operation fails for lack of one.

use crate::commands::{self, config::ConfigAction, CmdMessage, CmdResult};
use crate::config::NotecaseConfig;
use crate::error::{NotecaseError, Result};
use crate::index::{parse_indexes, DisplayIndex};
use crate::model::{Card, CardDraft, Item, ItemId, Note, NoteDraft};
use crate::preview::{fetch_or_unavailable, spawn_fetch, PreviewFetcher, PreviewOutcome, PreviewState};
use crate::store::{ItemStore, Location, Stored};
use crate::toast::{DeletionToast, ToastState};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::runtime::Handle;
use tokio::task::JoinSet;

pub struct NotecaseApi<F: PreviewFetcher> {
    store: ItemStore,
    toast: DeletionToast,
    selection: Option<ItemId>,
    previews: HashMap<ItemId, PreviewState>,
    fetcher: Arc<F>,
    outcomes_tx: mpsc::UnboundedSender<PreviewOutcome>,
    outcomes_rx: Option<mpsc::UnboundedReceiver<PreviewOutcome>>,
    config: NotecaseConfig,
    config_dir: PathBuf,
}

impl<F: PreviewFetcher> NotecaseApi<F> {
    pub fn new(fetcher: F, config: NotecaseConfig, config_dir: PathBuf) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            store: ItemStore::new(),
            toast: DeletionToast::new(config.toast_duration()),
            selection: None,
            previews: HashMap::new(),
            fetcher: Arc::new(fetcher),
            outcomes_tx,
            outcomes_rx: Some(outcomes_rx),
            config,
            config_dir,
        }
    }

    /// Hands out the receiving end for background preview outcomes, once.
    pub fn take_preview_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<PreviewOutcome>> {
        self.outcomes_rx.take()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn config(&self) -> &NotecaseConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // --- Lifecycle ---

    pub fn create_note(&mut self, draft: NoteDraft) -> Result<CmdResult> {
        commands::create::run::<Note>(&mut self.store, draft)
    }

    pub fn create_card(&mut self, draft: CardDraft) -> Result<CmdResult> {
        let result = commands::create::run::<Card>(&mut self.store, draft)?;
        self.request_previews();
        Ok(result)
    }

    /// Saves an edited note and clears the selection.
    pub fn update_note(&mut self, edited: Note) -> Result<CmdResult> {
        let mut result = commands::update::run(&mut self.store, edited)?;
        self.selection = None;
        note_if_unchanged::<Note>(&mut result);
        Ok(result)
    }

    /// Saves an edited card. A changed link drops the cached preview.
    pub fn update_card(&mut self, edited: Card) -> Result<CmdResult> {
        let id = edited.id;
        let before = self.link_of(id);
        let mut result = commands::update::run(&mut self.store, edited)?;
        if self.link_of(id) != before {
            self.previews.remove(&id);
        }
        self.request_previews();
        note_if_unchanged::<Card>(&mut result);
        Ok(result)
    }

    pub fn delete<T: Stored, I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<CmdResult> {
        let resolved = self.resolve::<T, I>(indexes)?;
        let mut result = CmdResult::default();
        for (_, id) in resolved {
            result.merge(commands::delete::run::<T>(&mut self.store, id)?);
            self.forget(id);
        }
        if let Some(kind) = result.deleted {
            self.toast.show(kind);
        }
        Ok(result)
    }

    pub fn restore<T: Stored, I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<CmdResult> {
        let resolved = self.resolve::<T, I>(indexes)?;
        let mut result = CmdResult::default();
        for (_, id) in resolved {
            result.merge(commands::restore::run::<T>(&mut self.store, id)?);
        }
        if result.is_noop() {
            result.add_message(CmdMessage::info(format!(
                "Nothing restored: only trashed {}s can be restored.",
                T::KIND
            )));
        }
        self.request_previews();
        Ok(result)
    }

    pub fn purge<T: Stored, I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<CmdResult> {
        let resolved = self.resolve::<T, I>(indexes)?;
        let mut result = CmdResult::default();
        for (_, id) in resolved {
            result.merge(commands::purge::run::<T>(&mut self.store, id)?);
            self.forget(id);
        }
        if result.is_noop() {
            result.add_message(CmdMessage::info(format!(
                "Nothing purged: only trashed {}s can be purged.",
                T::KIND
            )));
        }
        Ok(result)
    }

    pub fn empty_trash(&mut self) -> Result<CmdResult> {
        commands::purge::empty_trash(&mut self.store)
    }

    // --- Reading ---

    pub fn list(&self, location: Location) -> Result<CmdResult> {
        commands::list::run(&self.store, location)
    }

    pub fn view_notes<I: AsRef<str>>(&self, indexes: &[I]) -> Result<CmdResult> {
        let resolved = self.resolve::<Note, I>(indexes)?;
        Ok(CmdResult::default().with_listed_notes(commands::view::items(&self.store, &resolved)))
    }

    pub fn view_cards<I: AsRef<str>>(&self, indexes: &[I]) -> Result<CmdResult> {
        let resolved = self.resolve::<Card, I>(indexes)?;
        Ok(CmdResult::default().with_listed_cards(commands::view::items(&self.store, &resolved)))
    }

    /// A copy of the single item at `index`, ready to be edited.
    pub fn item<T: Stored>(&self, index: &str) -> Result<T> {
        let resolved = self.resolve::<T, &str>(&[index])?;
        let [(idx, id)] = resolved.as_slice() else {
            return Err(NotecaseError::Api(format!(
                "Expected a single {} index, got '{}'",
                T::KIND,
                index
            )));
        };
        self.store
            .get::<T>(idx.location(), *id)
            .cloned()
            .ok_or_else(|| NotecaseError::Api(format!("{} index {} not found", T::KIND.label(), idx)))
    }

    /// Like [`item`](Self::item), but refuses items sitting in the trash.
    pub fn item_to_edit<T: Stored>(&self, index: &str) -> Result<T> {
        let item = self.item::<T>(index)?;
        if self.store.shelf::<T>().locate(item.id()) != Some(Location::Active) {
            return Err(NotecaseError::Api(format!(
                "Only {}s in the collection can be edited; restore it first.",
                T::KIND
            )));
        }
        Ok(item)
    }

    // --- Selection ---

    pub fn select_note(&mut self, index: &str) -> Result<CmdResult> {
        let note = self.item::<Note>(index)?;
        if self.store.shelf::<Note>().locate(note.id) != Some(Location::Active) {
            return Err(NotecaseError::Api(
                "Only notes in the collection can be selected; restore it first.".to_string(),
            ));
        }
        self.selection = Some(note.id);

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!("Selected note: {}", note.title)));
        Ok(result)
    }

    /// The selected note, if it is still in the collection.
    pub fn selection(&self) -> Option<&Note> {
        self.selection
            .and_then(|id| self.store.get::<Note>(Location::Active, id))
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The note at `index`, or the selected one when no index is given.
    pub fn note_to_edit(&self, index: Option<&str>) -> Result<Note> {
        match index {
            Some(index) => self.item_to_edit::<Note>(index),
            None => self.selection().cloned().ok_or_else(|| {
                NotecaseError::Api("No note selected. Give an index or use 'select' first.".to_string())
            }),
        }
    }

    // --- Tags ---

    pub fn add_tags<S: AsRef<str>>(&mut self, index: &str, tags: &[S]) -> Result<CmdResult> {
        let note = self.item_to_edit::<Note>(index)?;
        commands::tagging::add_tags(&mut self.store, note.id, tags)
    }

    pub fn remove_tags<S: AsRef<str>>(&mut self, index: &str, tags: &[S]) -> Result<CmdResult> {
        let note = self.item_to_edit::<Note>(index)?;
        commands::tagging::remove_tags(&mut self.store, note.id, tags)
    }

    // --- Toast ---

    pub fn toast_state(&self) -> ToastState {
        self.toast.state()
    }

    /// Hides the toast; returns whether it was showing.
    pub fn dismiss_toast(&mut self) -> bool {
        let was_visible = self.toast.state().is_visible();
        self.toast.dismiss();
        was_visible
    }

    // --- Configuration ---

    /// Toast and accent settings apply at once; preview settings on next launch.
    pub fn configure(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&mut self.config, &self.config_dir, action)?;
        self.toast.set_duration(self.config.toast_duration());
        Ok(result)
    }

    // --- Previews ---

    pub fn preview_for(&self, id: ItemId) -> Option<&PreviewState> {
        self.previews.get(&id)
    }

    /// Starts fetches for active link cards that have no preview state yet.
    ///
    /// Returns how many cards were picked up. With previews disabled, or with
    /// no runtime to fetch on, the cards are marked unavailable right away and
    /// nothing is spawned.
    pub fn request_previews(&mut self) -> usize {
        let pending = self.link_cards(|state| state.is_none());
        let enabled = self.fetcher.is_enabled() && Handle::try_current().is_ok();

        for (id, url) in &pending {
            if !enabled {
                self.previews.insert(*id, PreviewState::Unavailable);
                continue;
            }
            self.previews.insert(*id, PreviewState::Loading);
            spawn_fetch(
                Arc::clone(&self.fetcher),
                *id,
                url.clone(),
                self.outcomes_tx.clone(),
            );
        }
        pending.len()
    }

    /// Records a finished fetch if its card is still active with the same link.
    pub fn apply_preview(&mut self, outcome: PreviewOutcome) -> bool {
        if self.link_of(outcome.card_id).as_deref() != Some(outcome.url.as_str()) {
            debug!(
                "discarding stale preview for card {}",
                outcome.card_id.short()
            );
            return false;
        }
        self.previews.insert(outcome.card_id, outcome.state);
        true
    }

    /// Fetches every link preview that is not ready yet and waits for them all.
    pub async fn refresh_previews(&mut self) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        let targets = self.link_cards(|state| !matches!(state, Some(PreviewState::Ready(_))));

        if targets.is_empty() {
            result.add_message(CmdMessage::info("No link previews to fetch."));
            return Ok(result);
        }

        if !self.fetcher.is_enabled() {
            for (id, _) in &targets {
                self.previews.insert(*id, PreviewState::Unavailable);
            }
            let reason = if self.config.preview.enabled {
                format!(
                    "Link previews need an API key in ${}.",
                    self.config.preview.api_key_env
                )
            } else {
                "Link previews are turned off (preview.enabled = false).".to_string()
            };
            result.add_message(CmdMessage::warning(reason));
            return Ok(result);
        }

        let mut fetches = JoinSet::new();
        for (card_id, url) in targets {
            self.previews.insert(card_id, PreviewState::Loading);
            let fetcher = Arc::clone(&self.fetcher);
            fetches.spawn(async move {
                let state = fetch_or_unavailable(fetcher.as_ref(), &url).await;
                PreviewOutcome {
                    card_id,
                    url,
                    state,
                }
            });
        }

        let (mut ready, mut unavailable) = (0, 0);
        while let Some(joined) = fetches.join_next().await {
            match joined {
                Ok(outcome) => {
                    let is_ready = matches!(outcome.state, PreviewState::Ready(_));
                    if self.apply_preview(outcome) {
                        if is_ready {
                            ready += 1;
                        } else {
                            unavailable += 1;
                        }
                    }
                }
                Err(e) => warn!("preview task failed: {}", e),
            }
        }

        let summary = format!("Previews: {} ready, {} unavailable.", ready, unavailable);
        result.add_message(if unavailable == 0 {
            CmdMessage::success(summary)
        } else {
            CmdMessage::warning(summary)
        });
        Ok(result)
    }

    // --- Internals ---

    fn resolve<T: Stored, I: AsRef<str>>(
        &self,
        indexes: &[I],
    ) -> Result<Vec<(DisplayIndex, ItemId)>> {
        let indexes = parse_indexes(indexes).map_err(NotecaseError::Api)?;
        if indexes.is_empty() {
            return Err(NotecaseError::Api(format!("No {} index given", T::KIND)));
        }
        commands::helpers::resolve_indexes::<T>(&self.store, &indexes)
    }

    /// The link of an active link card.
    fn link_of(&self, id: ItemId) -> Option<String> {
        self.store
            .get::<Card>(Location::Active, id)
            .filter(|card| card.is_link())
            .map(|card| card.content().to_string())
    }

    fn link_cards(&self, wanted: impl Fn(Option<&PreviewState>) -> bool) -> Vec<(ItemId, String)> {
        self.store
            .items::<Card>(Location::Active)
            .iter()
            .filter(|card| card.is_link() && wanted(self.previews.get(&card.id)))
            .map(|card| (card.id, card.content.clone()))
            .collect()
    }

    fn forget(&mut self, id: ItemId) {
        self.previews.remove(&id);
        if self.selection == Some(id) {
            self.selection = None;
        }
    }
}

fn note_if_unchanged<T: Stored>(result: &mut CmdResult) {
    if result.is_noop() {
        result.add_message(CmdMessage::info(format!(
            "Nothing updated: the {} is no longer in the collection.",
            T::KIND
        )));
    }
}
