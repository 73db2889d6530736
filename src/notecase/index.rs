//! # Display Indexes
//!
//! Items are identified by UUIDs internally, which nobody wants to type. The
//! client addresses items by their 1-based position in a collection instead:
//!
//! - `1`, `2`, `3`: active items, in collection order
//! - `t1`, `t2`: trashed items, in trash order
//!
//! Indexes are per kind: `1` names the first active note for note commands and
//! the first active card for card commands. They are recomputed from the store
//! on every call and resolved to ids before any lifecycle command runs.

use crate::model::Item;
use crate::store::Location;
use serde::Serialize;
use std::str::FromStr;

/// Most indexes a single range may name.
pub const MAX_RANGE_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayIndex {
    Active(usize),
    Trashed(usize),
}

impl DisplayIndex {
    pub fn location(&self) -> Location {
        match self {
            DisplayIndex::Active(_) => Location::Active,
            DisplayIndex::Trashed(_) => Location::Trashed,
        }
    }

    /// Zero-based position inside the collection.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DisplayIndex::Active(n) | DisplayIndex::Trashed(n) => n.checked_sub(1),
        }
    }

    fn at(location: Location, n: usize) -> Self {
        match location {
            Location::Active => DisplayIndex::Active(n),
            Location::Trashed => DisplayIndex::Trashed(n),
        }
    }
}

impl std::fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayIndex::Active(i) => write!(f, "{}", i),
            DisplayIndex::Trashed(i) => write!(f, "t{}", i),
        }
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (location, digits) = match s.strip_prefix('t') {
            Some(rest) => (Location::Trashed, rest),
            None => (Location::Active, s),
        };
        match digits.parse::<usize>() {
            Ok(0) => Err(format!("Indexes start at 1: {}", s)),
            Ok(n) => Ok(DisplayIndex::at(location, n)),
            Err(_) => Err(format!("Invalid index format: {}", s)),
        }
    }
}

/// An item paired with the index the client shows for it.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayItem<T> {
    #[serde(serialize_with = "serialize_index")]
    pub index: DisplayIndex,
    #[serde(flatten)]
    pub item: T,
}

fn serialize_index<S: serde::Serializer>(
    index: &DisplayIndex,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(index)
}

/// Assigns display indexes to a collection, keeping its order.
pub fn index_items<T: Item>(items: &[T], location: Location) -> Vec<DisplayItem<T>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| DisplayItem {
            index: DisplayIndex::at(location, i + 1),
            item: item.clone(),
        })
        .collect()
}

/// Parses a single index or a range of indexes.
///
/// - Single index: "3", "t2"
/// - Range: "1-3" (expands to 1, 2, 3), "t1-t3"
///
/// Both ends of a range must be in the same collection and start must not be
/// past end. Whether the indexes exist is checked later, during resolution.
pub fn parse_index_or_range(s: &str) -> Result<Vec<DisplayIndex>, String> {
    if let Some(dash_pos) = s.find('-') {
        if dash_pos > 0 {
            let start = DisplayIndex::from_str(&s[..dash_pos])?;
            let end = DisplayIndex::from_str(&s[dash_pos + 1..])?;
            return expand_range(start, end);
        }
    }

    DisplayIndex::from_str(s).map(|idx| vec![idx])
}

fn expand_range(start: DisplayIndex, end: DisplayIndex) -> Result<Vec<DisplayIndex>, String> {
    if start.location() != end.location() {
        return Err(format!(
            "Invalid range: cannot mix active and trashed indexes ({} and {})",
            start, end
        ));
    }
    let (s, e) = match (start, end) {
        (DisplayIndex::Active(s), DisplayIndex::Active(e))
        | (DisplayIndex::Trashed(s), DisplayIndex::Trashed(e)) => (s, e),
        _ => unreachable!("locations already compared"),
    };
    if s > e {
        return Err(format!(
            "Invalid range: start ({}) must be <= end ({})",
            start, end
        ));
    }
    if e - s >= MAX_RANGE_LEN {
        return Err(format!(
            "Invalid range: {}-{} names more than {} items",
            start, end, MAX_RANGE_LEN
        ));
    }
    let location = start.location();
    Ok((s..=e).map(|n| DisplayIndex::at(location, n)).collect())
}

/// Parses every input, expanding ranges and dropping repeats.
pub fn parse_indexes<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<DisplayIndex>, String> {
    let mut out: Vec<DisplayIndex> = Vec::new();
    for input in inputs {
        for idx in parse_index_or_range(input.as_ref())? {
            if !out.contains(&idx) {
                out.push(idx);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Note, NoteDraft};
    use crate::model::{Item, ItemId};
    use chrono::Utc;

    #[test]
    fn parses_active_and_trashed() {
        assert_eq!("3".parse::<DisplayIndex>(), Ok(DisplayIndex::Active(3)));
        assert_eq!("t2".parse::<DisplayIndex>(), Ok(DisplayIndex::Trashed(2)));
        assert!("0".parse::<DisplayIndex>().is_err());
        assert!("x1".parse::<DisplayIndex>().is_err());
        assert!("t".parse::<DisplayIndex>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for idx in [DisplayIndex::Active(7), DisplayIndex::Trashed(1)] {
            assert_eq!(idx.to_string().parse::<DisplayIndex>(), Ok(idx));
        }
    }

    #[test]
    fn expands_ranges() {
        assert_eq!(
            parse_index_or_range("1-3").unwrap(),
            vec![
                DisplayIndex::Active(1),
                DisplayIndex::Active(2),
                DisplayIndex::Active(3)
            ]
        );
        assert_eq!(
            parse_index_or_range("t2-t3").unwrap(),
            vec![DisplayIndex::Trashed(2), DisplayIndex::Trashed(3)]
        );
    }

    #[test]
    fn rejects_bad_ranges() {
        assert!(parse_index_or_range("3-1").is_err());
        assert!(parse_index_or_range("1-t2").is_err());
        assert!(parse_index_or_range("1-99999999999").is_err());
        assert_eq!(parse_index_or_range("1-1000").unwrap().len(), MAX_RANGE_LEN);
    }

    #[test]
    fn parse_indexes_dedups() {
        let parsed = parse_indexes(&["1-2", "2", "t1"]).unwrap();
        assert_eq!(
            parsed,
            vec![
                DisplayIndex::Active(1),
                DisplayIndex::Active(2),
                DisplayIndex::Trashed(1)
            ]
        );
    }

    #[test]
    fn index_items_follows_collection_order() {
        let notes: Vec<Note> = ["B", "A"]
            .iter()
            .map(|t| Note::from_draft(ItemId::new(), NoteDraft::new(*t, ""), Utc::now()))
            .collect();
        let indexed = index_items(&notes, Location::Trashed);
        assert_eq!(indexed[0].index, DisplayIndex::Trashed(1));
        assert_eq!(indexed[0].item.title(), "B");
        assert_eq!(indexed[1].index, DisplayIndex::Trashed(2));
    }
}
