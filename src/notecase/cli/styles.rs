//! Terminal styles for the notecase client.
//!
//! Renderers pick styles by what the text *is* (an index, a trashed title, a
//! timestamp), never by color, so the palette can change in one place. All
//! styles are built once through `once_cell::sync::Lazy`.
//!
//! `console` decides at print time whether the terminal gets ANSI codes, so
//! piped output stays plain.

use console::Style;
use once_cell::sync::Lazy;

pub struct Theme {
    pub heading: Style,
    pub index: Style,
    pub trashed_index: Style,
    pub title: Style,
    pub trashed_title: Style,
    /// First accent slot in the note cycle.
    pub highlight: Style,
    /// Second accent slot in the note cycle.
    pub bright: Style,
    pub muted: Style,
    pub time: Style,
    pub tag: Style,
    pub link: Style,
    pub toast: Style,
}

pub static THEME: Lazy<Theme> = Lazy::new(|| Theme {
    heading: Style::new().bold().underlined(),
    index: Style::new().yellow(),
    trashed_index: Style::new().red(),
    title: Style::new().bold(),
    trashed_title: Style::new().red().dim(),
    highlight: Style::new().black().on_yellow().bold(),
    bright: Style::new().cyan().bold(),
    muted: Style::new().color256(246),
    time: Style::new().color256(246).italic(),
    tag: Style::new().magenta(),
    link: Style::new().blue().underlined(),
    toast: Style::new().black().on_white(),
});
