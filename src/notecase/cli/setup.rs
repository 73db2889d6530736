use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

/// Launch arguments for the binary itself.
#[derive(Parser, Debug)]
#[command(name = "notecase", bin_name = "notecase", version)]
#[command(about = "Personal organizer for notes and cards", long_about = None)]
pub struct Cli {
    /// Verbose logging (debug level on stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

/// One line typed into the session.
#[derive(Parser, Debug)]
#[command(
    name = "notecase",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Note,
    Card,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Create,
    Browse,
    Lifecycle,
    Session,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Create => "Create:",
            CommandGroup::Browse => "Browse & Edit:",
            CommandGroup::Lifecycle => "Trash:",
            CommandGroup::Session => "Session:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "note" | "card" => Some(CommandGroup::Create),
            "list" | "view" | "select" | "edit" | "tag" | "untag" | "previews" => {
                Some(CommandGroup::Browse)
            }
            "trash" | "delete" | "restore" | "purge" | "empty-trash" => {
                Some(CommandGroup::Lifecycle)
            }
            "dismiss" | "config" | "help" | "quit" => Some(CommandGroup::Session),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Create,
            CommandGroup::Browse,
            CommandGroup::Lifecycle,
            CommandGroup::Session,
        ]
    }
}

#[derive(Subcommand, Debug)]
pub enum ReplCommand {
    /// Create a note
    #[command(alias = "n", display_order = 1)]
    Note {
        /// Title words (defaults to "New Note")
        title: Vec<String>,

        /// Note content (Markdown)
        #[arg(short, long)]
        content: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Write the note in $EDITOR
        #[arg(long)]
        edit: bool,
    },

    /// Create a card
    #[command(alias = "c", display_order = 2)]
    Card {
        title: String,

        /// Card text, or the URL for a link card
        content: String,

        /// Make it a link card
        #[arg(long)]
        link: bool,
    },

    /// Show the collection
    #[command(alias = "ls", display_order = 10)]
    List {
        /// Print JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Show one or more items in full
    #[command(alias = "v", display_order = 11)]
    View {
        #[arg(value_enum)]
        kind: KindArg,

        /// Indexes of the items (e.g. 1 2-3 t1)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Select a note for editing
    #[command(display_order = 12)]
    Select { index: String },

    /// Edit an item (a note without flags opens $EDITOR)
    #[command(alias = "e", display_order = 13)]
    Edit {
        #[arg(value_enum)]
        kind: KindArg,

        /// Index of the item; notes default to the selection
        index: Option<String>,

        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,

        /// New content
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Add tags to a note
    #[command(display_order = 14)]
    Tag {
        index: String,

        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Remove tags from a note
    #[command(display_order = 15)]
    Untag {
        index: String,

        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Fetch missing link previews and wait for them
    #[command(display_order = 16)]
    Previews,

    /// Show the trash
    #[command(display_order = 20)]
    Trash {
        /// Print JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Move items to the trash
    #[command(alias = "rm", display_order = 21)]
    Delete {
        #[arg(value_enum)]
        kind: KindArg,

        /// Indexes of the items (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Bring trashed items back
    #[command(display_order = 22)]
    Restore {
        #[arg(value_enum)]
        kind: KindArg,

        /// Indexes of the trashed items (e.g. t1 t2)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Permanently remove trashed items
    #[command(display_order = 23)]
    Purge {
        #[arg(value_enum)]
        kind: KindArg,

        /// Indexes of the trashed items (e.g. t1 t2)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Permanently remove everything in the trash
    #[command(display_order = 24)]
    EmptyTrash,

    /// Hide the deletion notice
    #[command(display_order = 30)]
    Dismiss,

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (e.g. toast_duration_ms)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for the session or a command
    #[command(display_order = 32)]
    Help { command: Option<String> },

    /// Leave the session
    #[command(alias = "exit", display_order = 33)]
    Quit,
}

/// Splits a typed line shell-style and parses it.
///
/// Blank lines give `Ok(None)`. Help requests come back as errors whose
/// `use_stderr()` is false, like any clap help output.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, clap::Error> {
    let words = shell_words::split(line).map_err(|e| {
        ReplLine::command().error(ErrorKind::InvalidValue, format!("cannot parse line: {}", e))
    })?;
    if words.is_empty() {
        return Ok(None);
    }
    ReplLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

pub fn get_grouped_help() -> String {
    let cmd = ReplLine::command();
    let mut output = String::new();
    output.push_str("Commands (KIND is note or card; indexes are 1, 2-4, t1 for trash):\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();
    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", sc.get_name(), about));
            }
        }
    }

    output.push_str("\nUse 'help COMMAND' or 'COMMAND --help' for details.\n");
    output
}

/// Help for one command by name or alias, or `None` if it does not exist.
pub fn help_for_command(name: &str) -> Option<String> {
    let mut cmd = ReplLine::command();
    let help = cmd
        .get_subcommands_mut()
        .find(|sc| sc.get_name() == name || sc.get_all_aliases().any(|a| a == name))
        .map(|sc| sc.render_help().to_string());
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ReplCommand {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn command_tree_is_valid() {
        ReplLine::command().debug_assert();
        Cli::command().debug_assert();
    }

    #[test]
    fn blank_line_is_nothing() {
        assert!(parse_line("   ").unwrap().is_none());
    }

    #[test]
    fn note_with_quoted_content_and_tags() {
        match parse("note Weekly plan -c 'milk, eggs' -t home --tag errands") {
            ReplCommand::Note {
                title,
                content,
                tags,
                edit,
            } => {
                assert_eq!(title.join(" "), "Weekly plan");
                assert_eq!(content.as_deref(), Some("milk, eggs"));
                assert_eq!(tags, vec!["home", "errands"]);
                assert!(!edit);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn aliases() {
        assert!(matches!(parse("n"), ReplCommand::Note { .. }));
        assert!(matches!(parse("ls"), ReplCommand::List { json: false }));
        assert!(matches!(parse("exit"), ReplCommand::Quit));
        assert!(matches!(
            parse("rm card 1-2"),
            ReplCommand::Delete {
                kind: KindArg::Card,
                ..
            }
        ));
    }

    #[test]
    fn link_card() {
        match parse(r#"card "Docs" https://docs.example.com --link"#) {
            ReplCommand::Card {
                title,
                content,
                link,
            } => {
                assert_eq!(title, "Docs");
                assert_eq!(content, "https://docs.example.com");
                assert!(link);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn edit_without_index_uses_selection() {
        match parse("edit note -T 'New title'") {
            ReplCommand::Edit {
                kind,
                index,
                title,
                content,
            } => {
                assert_eq!(kind, KindArg::Note);
                assert_eq!(index, None);
                assert_eq!(title.as_deref(), Some("New title"));
                assert_eq!(content, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn kebab_case_empty_trash() {
        assert!(matches!(parse("empty-trash"), ReplCommand::EmptyTrash));
    }

    #[test]
    fn errors_are_reported() {
        let unknown = parse_line("frobnicate").unwrap_err();
        assert!(unknown.use_stderr());

        let missing = parse_line("delete note").unwrap_err();
        assert!(missing.use_stderr());

        let unbalanced = parse_line("note 'oops").unwrap_err();
        assert!(unbalanced.to_string().contains("cannot parse line"));

        let help = parse_line("list --help").unwrap_err();
        assert!(!help.use_stderr());
    }

    #[test]
    fn grouped_help_lists_every_command() {
        let help = get_grouped_help();
        for name in ["note", "card", "list", "trash", "empty-trash", "previews", "quit"] {
            assert!(help.contains(name), "help is missing {}", name);
        }
        assert!(help_for_command("rm").is_some());
        assert!(help_for_command("nope").is_none());
    }

    #[test]
    fn alias_help_matches_command_help() {
        let by_alias = help_for_command("rm").unwrap();
        assert_eq!(Some(by_alias.clone()), help_for_command("delete"));
        assert!(by_alias.contains("Move items to the trash"));
    }
}
