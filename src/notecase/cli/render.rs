//! # Rendering
//!
//! Turns `CmdResult` data into terminal text. Every function returns a
//! `String` so tests can inspect the exact output; the command loop prints.
//!
//! Layout math (truncation, padding) is done here with `unicode-width` so wide
//! characters in titles keep the columns aligned. Styling comes from
//! [`super::styles::THEME`].

use super::styles::THEME;
use chrono::{DateTime, Utc};
use colored::Colorize;
use console::Style;
use notecase::commands::{CmdMessage, MessageLevel};
use notecase::config::{NotecaseConfig, CONFIG_KEYS};
use notecase::error::Result;
use notecase::index::{DisplayIndex, DisplayItem};
use notecase::model::{Card, ItemId, Note};
use notecase::preview::PreviewState;
use notecase::text::{accent_for, clamp_lines, plain_text, Accent};
use notecase::toast::ToastState;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 80;
const TIME_WIDTH: usize = 16;
const PREVIEW_LINES: usize = 2;
const EMPTY_COLLECTION: &str = "Your collection is empty";
const EMPTY_TRASH: &str = "Trash is empty";
const NO_PREVIEW: &str = "No preview available";

/// Collection view: notes with accents and tags, then cards with previews.
pub fn render_collection(
    notes: &[DisplayItem<Note>],
    cards: &[DisplayItem<Card>],
    preview_for: impl Fn(ItemId) -> Option<PreviewState>,
    accent_variants: usize,
    toast: ToastState,
) -> String {
    let mut out = String::new();
    if let Some(banner) = render_toast(toast) {
        out.push_str(&banner);
    }

    if notes.is_empty() && cards.is_empty() {
        out.push_str(EMPTY_COLLECTION);
        out.push('\n');
        return out;
    }

    if !notes.is_empty() {
        out.push_str(&format!("{}\n", THEME.heading.apply_to("Notes")));
        for (position, dn) in notes.iter().enumerate() {
            let accent = accent_for(position, accent_variants);
            out.push_str(&note_line(dn, accent));
            let body = clamp_lines(&plain_text(&dn.item.content), PREVIEW_LINES);
            for line in body.lines() {
                out.push_str(&detail_line(line, &THEME.muted));
            }
        }
    }

    if !cards.is_empty() {
        if !notes.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{}\n", THEME.heading.apply_to("Cards")));
        for dc in cards {
            out.push_str(&card_line(dc, false));
            out.push_str(&card_details(&dc.item, preview_for(dc.item.id)));
        }
    }

    out
}

/// Trash view: trashed notes then trashed cards, without previews.
pub fn render_trash(notes: &[DisplayItem<Note>], cards: &[DisplayItem<Card>]) -> String {
    if notes.is_empty() && cards.is_empty() {
        return format!("{}\n", EMPTY_TRASH);
    }

    let mut out = String::new();
    if !notes.is_empty() {
        out.push_str(&format!("{}\n", THEME.heading.apply_to("Trashed notes")));
        for dn in notes {
            out.push_str(&list_line(
                dn.index,
                &THEME.trashed_title,
                &dn.item.title,
                &tags_label(&dn.item),
                dn.item.date,
            ));
        }
    }
    if !cards.is_empty() {
        if !notes.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{}\n", THEME.heading.apply_to("Trashed cards")));
        for dc in cards {
            out.push_str(&card_line(dc, true));
        }
    }
    out
}

/// Full display of notes, content flattened to plain text.
pub fn render_full_notes(notes: &[DisplayItem<Note>]) -> String {
    let entries: Vec<String> = notes
        .iter()
        .map(|dn| {
            let mut entry = full_header(dn.index, &dn.item.title, dn.item.date);
            if !dn.item.tags.is_empty() {
                entry.push_str(&format!("Tags: {}\n", THEME.tag.apply_to(tags_label(&dn.item))));
            }
            entry.push('\n');
            let body = plain_text(&dn.item.content);
            if body.is_empty() {
                entry.push_str(&format!("{}\n", THEME.muted.apply_to("(no content)")));
            } else {
                entry.push_str(&body);
                entry.push('\n');
            }
            entry
        })
        .collect();
    entries.join(&format!("\n{}\n\n", "=".repeat(32)))
}

/// Full display of cards; link cards also show their preview state.
pub fn render_full_cards(
    cards: &[DisplayItem<Card>],
    preview_for: impl Fn(ItemId) -> Option<PreviewState>,
) -> String {
    let entries: Vec<String> = cards
        .iter()
        .map(|dc| {
            let mut entry = full_header(dc.index, &dc.item.title, dc.item.date);
            entry.push('\n');
            if dc.item.is_link() {
                entry.push_str(&format!("{}\n", THEME.link.apply_to(&dc.item.content)));
                if dc.index.location() == notecase::store::Location::Active {
                    entry.push_str(&preview_text(preview_for(dc.item.id)));
                }
            } else {
                entry.push_str(&dc.item.content);
                entry.push('\n');
            }
            entry
        })
        .collect();
    entries.join(&format!("\n{}\n\n", "=".repeat(32)))
}

/// Notice shown while the deletion toast is visible.
pub fn render_toast(state: ToastState) -> Option<String> {
    state.message().map(|message| {
        format!(
            "{}  {}\n",
            THEME.toast.apply_to(format!(" {} ", message)),
            THEME.muted.apply_to("(dismiss to hide)")
        )
    })
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let line = match message.level {
                MessageLevel::Info => message.content.dimmed(),
                MessageLevel::Success => message.content.green(),
                MessageLevel::Warning => message.content.yellow(),
                MessageLevel::Error => message.content.red(),
            };
            format!("{}\n", line)
        })
        .collect()
}

pub fn render_config(config: &NotecaseConfig) -> String {
    CONFIG_KEYS
        .iter()
        .map(|key| format!("{} = {}\n", key, config.get(key).unwrap_or_default()))
        .collect()
}

#[derive(Serialize)]
struct JsonListing<'a> {
    notes: &'a [DisplayItem<Note>],
    cards: &'a [DisplayItem<Card>],
}

pub fn render_json(notes: &[DisplayItem<Note>], cards: &[DisplayItem<Card>]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&JsonListing { notes, cards })?;
    json.push('\n');
    Ok(json)
}

// --- Line builders ---

fn note_line(dn: &DisplayItem<Note>, accent: Accent) -> String {
    let style = match accent {
        Accent::Highlight => &THEME.highlight,
        Accent::Bright => &THEME.bright,
        Accent::Plain => &THEME.title,
    };
    list_line(dn.index, style, &dn.item.title, &tags_label(&dn.item), dn.item.date)
}

fn card_line(dc: &DisplayItem<Card>, trashed: bool) -> String {
    let style = if trashed {
        &THEME.trashed_title
    } else {
        &THEME.title
    };
    let kind = if dc.item.is_link() { "link" } else { "" };
    list_line(dc.index, style, &dc.item.title, kind, dc.item.date)
}

/// `  3. Title ........ [suffix]   5 minutes ago`
fn list_line(
    index: DisplayIndex,
    title_style: &Style,
    title: &str,
    suffix: &str,
    date: DateTime<Utc>,
) -> String {
    let idx = format!("{:>4}. ", index.to_string());
    let suffix = if suffix.is_empty() {
        String::new()
    } else {
        format!(" [{}]", suffix)
    };

    let fixed = idx.width() + suffix.width() + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let title = truncate_to_width(title, available);
    let padding = " ".repeat(available.saturating_sub(title.width()));

    let idx_style = match index {
        DisplayIndex::Active(_) => &THEME.index,
        DisplayIndex::Trashed(_) => &THEME.trashed_index,
    };

    format!(
        "{}{}{}{}{}\n",
        idx_style.apply_to(idx),
        title_style.apply_to(title),
        THEME.tag.apply_to(suffix),
        padding,
        THEME.time.apply_to(format!("{:>width$}", format_time_ago(date), width = TIME_WIDTH))
    )
}

fn detail_line(text: &str, style: &Style) -> String {
    let indent = "        ";
    let text = truncate_to_width(text, LINE_WIDTH.saturating_sub(indent.len()));
    format!("{}{}\n", indent, style.apply_to(text))
}

fn card_details(card: &Card, preview: Option<PreviewState>) -> String {
    if !card.is_link() {
        return clamp_lines(&card.content, PREVIEW_LINES)
            .lines()
            .map(|line| detail_line(line, &THEME.muted))
            .collect();
    }
    let mut out = detail_line(&card.content, &THEME.link);
    for line in preview_text(preview).lines() {
        out.push_str(&detail_line(line, &THEME.muted));
    }
    out
}

fn preview_text(preview: Option<PreviewState>) -> String {
    match preview {
        Some(PreviewState::Ready(p)) => {
            let mut out = String::new();
            match p.title {
                Some(title) if !title.trim().is_empty() => out.push_str(&format!("{}\n", title.trim())),
                _ => out.push_str("(untitled page)\n"),
            }
            if let Some(image) = p.image.filter(|i| !i.trim().is_empty()) {
                out.push_str(&format!("Image: {}\n", image));
            }
            out
        }
        Some(PreviewState::Loading) => "Loading preview…\n".to_string(),
        Some(PreviewState::Unavailable) | None => format!("{}\n", NO_PREVIEW),
    }
}

fn full_header(index: DisplayIndex, title: &str, date: DateTime<Utc>) -> String {
    let idx_style = match index {
        DisplayIndex::Active(_) => &THEME.index,
        DisplayIndex::Trashed(_) => &THEME.trashed_index,
    };
    format!(
        "{} {}\n{}\n",
        idx_style.apply_to(index.to_string()),
        THEME.title.apply_to(title),
        THEME.time.apply_to(format!(
            "{} ({})",
            date.format("%Y-%m-%d %H:%M"),
            format_time_ago(date)
        ))
    )
}

fn tags_label(note: &Note) -> String {
    note.tags.iter().collect::<Vec<_>>().join(", ")
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(elapsed.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notecase::index::index_items;
    use notecase::model::{CardDraft, Item, ItemKind, NoteDraft};
    use notecase::preview::LinkPreview;
    use notecase::store::Location;

    fn note(title: &str, content: &str, tags: &[&str]) -> Note {
        Note::from_draft(
            ItemId::new(),
            NoteDraft::new(title, content).with_tags(tags.iter().copied()),
            Utc::now(),
        )
    }

    fn card(draft: CardDraft) -> Card {
        Card::from_draft(ItemId::new(), draft, Utc::now())
    }

    fn no_preview(_: ItemId) -> Option<PreviewState> {
        None
    }

    #[test]
    fn empty_collection() {
        let out = render_collection(&[], &[], no_preview, 4, ToastState::Hidden);
        assert_eq!(out.trim(), "Your collection is empty");
    }

    #[test]
    fn collection_shows_notes_then_cards() {
        let notes = index_items(&[note("Groceries", "- milk\n- eggs", &["home"])], Location::Active);
        let cards = index_items(&[card(CardDraft::text("Quote", "Be kind"))], Location::Active);

        let out = render_collection(&notes, &cards, no_preview, 4, ToastState::Hidden);
        let groceries = out.find("Groceries").unwrap();
        let quote = out.find("Quote").unwrap();
        assert!(groceries < quote);
        assert!(out.contains("[home]"));
        assert!(out.contains("milk"));
        assert!(out.contains("Be kind"));
    }

    #[test]
    fn link_card_without_preview_still_shows_link() {
        let cards = index_items(
            &[card(CardDraft::link("Docs", "https://docs.example.com"))],
            Location::Active,
        );
        let out = render_collection(
            &[],
            &cards,
            |_| Some(PreviewState::Unavailable),
            4,
            ToastState::Hidden,
        );
        assert!(out.contains("Docs"));
        assert!(out.contains("https://docs.example.com"));
        assert!(out.contains("No preview available"));
    }

    #[test]
    fn ready_preview_shows_title_and_image() {
        let text = preview_text(Some(PreviewState::Ready(LinkPreview {
            title: Some("Example Domain".into()),
            image: Some("https://example.com/og.png".into()),
        })));
        assert_eq!(text, "Example Domain\nImage: https://example.com/og.png\n");
        assert_eq!(preview_text(Some(PreviewState::Loading)), "Loading preview…\n");
    }

    #[test]
    fn visible_toast_leads_the_collection() {
        let out = render_collection(&[], &[], no_preview, 4, ToastState::Visible(ItemKind::Note));
        let toast = out
            .find("Note was deleted. You can recover it anytime from the trash.")
            .unwrap();
        assert!(toast < out.find("Your collection is empty").unwrap());
    }

    #[test]
    fn empty_trash() {
        assert_eq!(render_trash(&[], &[]), "Trash is empty\n");
    }

    #[test]
    fn trash_uses_trash_indexes() {
        let notes = index_items(&[note("Old", "", &[])], Location::Trashed);
        let out = render_trash(&notes, &[]);
        assert!(out.contains("t1."));
        assert!(out.contains("Old"));
    }

    #[test]
    fn full_note_flattens_markup() {
        let notes = index_items(&[note("Plan", "# Steps\n\n**one**", &["work"])], Location::Active);
        let out = render_full_notes(&notes);
        assert!(out.contains("1 Plan"));
        assert!(out.contains("Tags: work"));
        assert!(out.contains("Steps\none"));
        assert!(!out.contains("**"));
    }

    #[test]
    fn truncation_respects_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let cut = truncate_to_width("a very long title indeed", 10);
        assert_eq!(cut.width(), 10);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate_to_width("日本語のタイトル", 7).width(), 7);
    }

    #[test]
    fn list_lines_fit_the_width() {
        let long = "x".repeat(200);
        let line = list_line(
            DisplayIndex::Active(12),
            &Style::new(),
            &long,
            "tag",
            Utc::now(),
        );
        assert!(console::strip_ansi_codes(line.trim_end()).width() <= LINE_WIDTH);
    }

    #[test]
    fn messages_keep_their_text() {
        let out = render_messages(&[
            CmdMessage::success("Note created: Groceries"),
            CmdMessage::error("Note index 9 not found"),
        ]);
        assert!(out.contains("Note created: Groceries"));
        assert!(out.contains("Note index 9 not found"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn json_listing_uses_display_indexes() {
        let notes = index_items(&[note("Groceries", "milk", &[])], Location::Active);
        let json = render_json(&notes, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["notes"][0]["index"], "1");
        assert_eq!(value["notes"][0]["title"], "Groceries");
        assert!(value["cards"].as_array().unwrap().is_empty());
    }

    #[test]
    fn config_lists_every_key() {
        let out = render_config(&NotecaseConfig::default());
        assert!(out.contains("toast_duration_ms = 3000"));
        assert_eq!(out.lines().count(), CONFIG_KEYS.len());
    }
}
