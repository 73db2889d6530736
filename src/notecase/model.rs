use crate::error::{NotecaseError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_NOTE_TITLE: &str = "New Note";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First block of the UUID, enough to tell items apart in messages.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Note,
    Card,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Note => "Note",
            ItemKind::Card => "Card",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Note => write!(f, "note"),
            ItemKind::Card => write!(f, "card"),
        }
    }
}

/// Ordered tag set: insertion order is kept, duplicates and blanks are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a tag, returning false when it was blank or already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for tag in iter {
            tags.insert(tag.as_ref());
        }
        tags
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Text,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: ItemId,
    pub title: String,
    /// Rich text: Markdown, possibly with inline HTML.
    pub content: String,
    pub date: DateTime<Utc>,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: ItemId,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub card_type: CardType,
    /// Link cards mirror their URL here so the view can request a preview.
    pub image_url: Option<String>,
}

impl Card {
    pub fn is_link(&self) -> bool {
        self.card_type == CardType::Link
    }

    fn image_url_for(card_type: CardType, content: &str) -> Option<String> {
        match card_type {
            CardType::Link => Some(content.to_string()),
            CardType::Text => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Tags,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Tags::new(),
        }
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub title: String,
    pub content: String,
    pub card_type: CardType,
}

impl CardDraft {
    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            card_type: CardType::Text,
        }
    }

    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: url.into(),
            card_type: CardType::Link,
        }
    }
}

/// Behaviour shared by every kind of item the organizer holds.
///
/// The lifecycle commands are written once against this trait, so notes and
/// cards go through identical create/update/delete/restore/purge logic.
pub trait Item: Clone + fmt::Debug + Serialize {
    type Draft;

    const KIND: ItemKind;

    fn id(&self) -> ItemId;
    fn title(&self) -> &str;
    fn content(&self) -> &str;
    fn date(&self) -> DateTime<Utc>;

    fn from_draft(id: ItemId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Rejects items that would be saved with missing or malformed fields.
    fn validate(&self) -> Result<()>;

    /// Builds the stored replacement for `self` out of an edited copy.
    fn revise(&self, edited: Self, now: DateTime<Utc>) -> Self;

    fn into_any(self) -> AnyItem;
}

impl Item for Note {
    type Draft = NoteDraft;

    const KIND: ItemKind = ItemKind::Note;

    fn id(&self) -> ItemId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn from_draft(id: ItemId, draft: NoteDraft, now: DateTime<Utc>) -> Self {
        Note {
            id,
            title: draft.title,
            content: draft.content,
            date: now,
            tags: draft.tags,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(NotecaseError::validation("title", "a note needs a title"));
        }
        Ok(())
    }

    fn revise(&self, edited: Self, now: DateTime<Utc>) -> Self {
        Note {
            id: self.id,
            date: now,
            ..edited
        }
    }

    fn into_any(self) -> AnyItem {
        AnyItem::Note(self)
    }
}

impl Item for Card {
    type Draft = CardDraft;

    const KIND: ItemKind = ItemKind::Card;

    fn id(&self) -> ItemId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn from_draft(id: ItemId, draft: CardDraft, now: DateTime<Utc>) -> Self {
        let image_url = Card::image_url_for(draft.card_type, &draft.content);
        Card {
            id,
            title: draft.title,
            content: draft.content,
            date: now,
            card_type: draft.card_type,
            image_url,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(NotecaseError::validation("title", "a card needs a title"));
        }
        if self.content.trim().is_empty() {
            return Err(NotecaseError::validation(
                "content",
                "a card needs some content",
            ));
        }
        if self.card_type == CardType::Link {
            validate_link(&self.content)?;
        }
        Ok(())
    }

    fn revise(&self, edited: Self, now: DateTime<Utc>) -> Self {
        // The type is fixed at creation, whatever the edited copy says.
        let card_type = self.card_type;
        Card {
            id: self.id,
            date: now,
            card_type,
            image_url: Card::image_url_for(card_type, &edited.content),
            ..edited
        }
    }

    fn into_any(self) -> AnyItem {
        AnyItem::Card(self)
    }
}

fn validate_link(content: &str) -> Result<()> {
    let parsed = url::Url::parse(content.trim()).map_err(|e| {
        NotecaseError::validation("link", format!("'{}' is not a valid URL ({})", content, e))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(NotecaseError::validation(
            "link",
            format!("unsupported scheme '{}', use http or https", other),
        )),
    }
}

/// An item of either kind, as carried in command results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnyItem {
    Note(Note),
    Card(Card),
}

impl AnyItem {
    pub fn id(&self) -> ItemId {
        match self {
            AnyItem::Note(n) => n.id,
            AnyItem::Card(c) => c.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            AnyItem::Note(_) => ItemKind::Note,
            AnyItem::Card(_) => ItemKind::Card,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            AnyItem::Note(n) => &n.title,
            AnyItem::Card(c) => &c.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_ignore_duplicates_and_blanks() {
        let mut tags = Tags::new();
        assert!(tags.insert("work"));
        assert!(!tags.insert("work"));
        assert!(!tags.insert("  "));
        assert!(tags.insert(" home "));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["work", "home"]);
    }

    #[test]
    fn tags_deserialize_without_duplicates() {
        let tags: Tags = serde_json::from_str(r#"["a","b","a"]"#).unwrap();
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn link_card_mirrors_url_into_image_url() {
        let card = Card::from_draft(
            ItemId::new(),
            CardDraft::link("Docs", "https://example.com"),
            Utc::now(),
        );
        assert_eq!(card.image_url.as_deref(), Some("https://example.com"));

        let text = Card::from_draft(ItemId::new(), CardDraft::text("T", "body"), Utc::now());
        assert_eq!(text.image_url, None);
    }

    #[test]
    fn revise_keeps_card_type() {
        let original = Card::from_draft(
            ItemId::new(),
            CardDraft::link("Docs", "https://example.com"),
            Utc::now(),
        );
        let mut edited = original.clone();
        edited.card_type = CardType::Text;
        edited.content = "https://example.org".into();

        let revised = original.revise(edited, Utc::now());
        assert_eq!(revised.card_type, CardType::Link);
        assert_eq!(revised.image_url.as_deref(), Some("https://example.org"));
        assert_eq!(revised.id, original.id);
    }

    #[test]
    fn card_validation() {
        let now = Utc::now();
        let empty = Card::from_draft(ItemId::new(), CardDraft::text("Title", ""), now);
        assert!(matches!(
            empty.validate(),
            Err(NotecaseError::Validation { field: "content", .. })
        ));

        let bad_link = Card::from_draft(ItemId::new(), CardDraft::link("L", "not a url"), now);
        assert!(matches!(
            bad_link.validate(),
            Err(NotecaseError::Validation { field: "link", .. })
        ));

        let ftp = Card::from_draft(ItemId::new(), CardDraft::link("L", "ftp://x.org"), now);
        assert!(ftp.validate().is_err());
    }

    #[test]
    fn note_requires_title() {
        let note = Note::from_draft(ItemId::new(), NoteDraft::new(" ", "body"), Utc::now());
        assert!(note.validate().is_err());

        let empty_body = Note::from_draft(ItemId::new(), NoteDraft::new("T", ""), Utc::now());
        assert!(empty_body.validate().is_ok());
    }
}
