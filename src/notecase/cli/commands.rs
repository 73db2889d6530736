//! # Session Loop
//!
//! The client reads one command per line from stdin, dispatches it to the
//! `NotecaseApi`, and prints the rendered result. A failing command prints its
//! error and the session carries on; only I/O failure on stdin ends it early.
//!
//! While waiting for input the loop also listens for link previews finishing
//! in the background, so a preview can land between two commands.
//!
//! Handlers follow one shape: call the API, render the `CmdResult`, print.

use super::render::{
    render_collection, render_config, render_full_cards, render_full_notes, render_json,
    render_messages, render_toast, render_trash,
};
use super::setup::{get_grouped_help, help_for_command, parse_line, Cli, KindArg, ReplCommand};
use clap::Parser;
use colored::Colorize;
use log::{debug, info, warn};
use notecase::api::NotecaseApi;
use notecase::commands::config::ConfigAction;
use notecase::commands::CmdResult;
use notecase::config::{self, NotecaseConfig};
use notecase::editor::{edit_content, EditorContent};
use notecase::error::{NotecaseError, Result};
use notecase::model::{Card, CardDraft, Note, NoteDraft, DEFAULT_NOTE_TITLE};
use notecase::preview::{HttpPreviewFetcher, PreviewOutcome, PreviewState};
use notecase::store::Location;
use std::io::{IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

type Api = NotecaseApi<Option<HttpPreviewFetcher>>;

struct AppContext {
    api: Api,
    interactive: bool,
}

enum Flow {
    Continue,
    Quit,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context()?;
    let mut outcomes = ctx
        .api
        .take_preview_receiver()
        .ok_or_else(|| NotecaseError::Api("preview channel already in use".to_string()))?;

    if ctx.interactive {
        println!(
            "notecase {}. Type 'help' for commands, 'quit' to leave.",
            env!("CARGO_PKG_VERSION")
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&ctx);
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(&mut ctx, &line).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                }
            }
            Some(outcome) = outcomes.recv() => handle_preview(&mut ctx, outcome),
        }
    }

    info!("session ended");
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "notecase=debug,warn" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();
}

fn init_context() -> Result<AppContext> {
    let config_dir = config::config_dir()?;
    let config = NotecaseConfig::load(&config_dir).unwrap_or_else(|e| {
        warn!("ignoring unreadable config in {}: {}", config_dir.display(), e);
        NotecaseConfig::default()
    });
    let fetcher = HttpPreviewFetcher::from_config(&config.preview).unwrap_or_else(|e| {
        warn!("link previews disabled: {}", e);
        None
    });
    debug!(
        "config dir {}, previews {}",
        config_dir.display(),
        if fetcher.is_some() { "on" } else { "off" }
    );

    Ok(AppContext {
        api: NotecaseApi::new(fetcher, config, config_dir),
        interactive: std::io::stdin().is_terminal(),
    })
}

fn prompt(ctx: &AppContext) {
    if ctx.interactive {
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}

async fn handle_line(ctx: &mut AppContext, line: &str) -> Result<Flow> {
    let command = match parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(Flow::Continue),
        Err(e) => {
            if e.use_stderr() {
                eprint!("{}", e.render());
            } else {
                print!("{}", e.render());
            }
            return Ok(Flow::Continue);
        }
    };
    debug!("command: {:?}", command);

    match command {
        ReplCommand::Note {
            title,
            content,
            tags,
            edit,
        } => handle_note(ctx, title, content, tags, edit)?,
        ReplCommand::Card {
            title,
            content,
            link,
        } => handle_card(ctx, title, content, link)?,
        ReplCommand::List { json } => handle_list(ctx, json)?,
        ReplCommand::Trash { json } => handle_trash(ctx, json)?,
        ReplCommand::View { kind, indexes } => handle_view(ctx, kind, &indexes)?,
        ReplCommand::Select { index } => print_result(&ctx.api.select_note(&index)?),
        ReplCommand::Edit {
            kind,
            index,
            title,
            content,
        } => handle_edit(ctx, kind, index, title, content)?,
        ReplCommand::Tag { index, tags } => print_result(&ctx.api.add_tags(&index, &tags)?),
        ReplCommand::Untag { index, tags } => {
            print_result(&ctx.api.remove_tags(&index, &tags)?)
        }
        ReplCommand::Previews => print_result(&ctx.api.refresh_previews().await?),
        ReplCommand::Delete { kind, indexes } => handle_delete(ctx, kind, &indexes)?,
        ReplCommand::Restore { kind, indexes } => {
            let result = match kind {
                KindArg::Note => ctx.api.restore::<Note, _>(&indexes)?,
                KindArg::Card => ctx.api.restore::<Card, _>(&indexes)?,
            };
            print_result(&result);
        }
        ReplCommand::Purge { kind, indexes } => {
            let result = match kind {
                KindArg::Note => ctx.api.purge::<Note, _>(&indexes)?,
                KindArg::Card => ctx.api.purge::<Card, _>(&indexes)?,
            };
            print_result(&result);
        }
        ReplCommand::EmptyTrash => print_result(&ctx.api.empty_trash()?),
        ReplCommand::Dismiss => handle_dismiss(ctx),
        ReplCommand::Config { key, value } => handle_config(ctx, key, value)?,
        ReplCommand::Help { command } => handle_help(command.as_deref()),
        ReplCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_result(result: &CmdResult) {
    print!("{}", render_messages(&result.messages));
}

fn handle_note(
    ctx: &mut AppContext,
    title: Vec<String>,
    content: Option<String>,
    tags: Vec<String>,
    edit: bool,
) -> Result<()> {
    let mut title = title.join(" ");
    let mut content = content.unwrap_or_default();

    if edit {
        let edited = edit_content(&EditorContent::new(title, content))?;
        title = edited.title;
        content = edited.content;
    }
    if title.trim().is_empty() {
        title = DEFAULT_NOTE_TITLE.to_string();
    }

    let draft = NoteDraft::new(title, content).with_tags(tags);
    print_result(&ctx.api.create_note(draft)?);
    Ok(())
}

fn handle_card(ctx: &mut AppContext, title: String, content: String, link: bool) -> Result<()> {
    let draft = if link {
        CardDraft::link(title, content.trim())
    } else {
        CardDraft::text(title, content)
    };
    print_result(&ctx.api.create_card(draft)?);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, json: bool) -> Result<()> {
    let result = ctx.api.list(Location::Active)?;
    if json {
        print!("{}", render_json(&result.listed_notes, &result.listed_cards)?);
        return Ok(());
    }

    let api = &ctx.api;
    print!(
        "{}",
        render_collection(
            &result.listed_notes,
            &result.listed_cards,
            |id| api.preview_for(id).cloned(),
            api.config().accent_variants,
            api.toast_state(),
        )
    );
    print_result(&result);
    Ok(())
}

fn handle_trash(ctx: &mut AppContext, json: bool) -> Result<()> {
    let result = ctx.api.list(Location::Trashed)?;
    if json {
        print!("{}", render_json(&result.listed_notes, &result.listed_cards)?);
    } else {
        print!("{}", render_trash(&result.listed_notes, &result.listed_cards));
    }
    Ok(())
}

fn handle_view(ctx: &mut AppContext, kind: KindArg, indexes: &[String]) -> Result<()> {
    match kind {
        KindArg::Note => {
            let result = ctx.api.view_notes(indexes)?;
            print!("{}", render_full_notes(&result.listed_notes));
        }
        KindArg::Card => {
            let result = ctx.api.view_cards(indexes)?;
            let api = &ctx.api;
            print!(
                "{}",
                render_full_cards(&result.listed_cards, |id| api.preview_for(id).cloned())
            );
        }
    }
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    kind: KindArg,
    index: Option<String>,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let result = match kind {
        KindArg::Note => {
            let mut note = ctx.api.note_to_edit(index.as_deref())?;
            if title.is_none() && content.is_none() {
                let edited = edit_content(&EditorContent::new(&note.title, &note.content))?;
                note.title = edited.title;
                note.content = edited.content;
            } else {
                if let Some(title) = title {
                    note.title = title;
                }
                if let Some(content) = content {
                    note.content = content;
                }
            }
            ctx.api.update_note(note)?
        }
        KindArg::Card => {
            let index = index.ok_or_else(|| {
                NotecaseError::Api("Editing a card needs its index".to_string())
            })?;
            if title.is_none() && content.is_none() {
                return Err(NotecaseError::Api(
                    "Nothing to change: pass --title and/or --content".to_string(),
                ));
            }
            let mut card = ctx.api.item_to_edit::<Card>(&index)?;
            if let Some(title) = title {
                card.title = title;
            }
            if let Some(content) = content {
                card.content = if card.is_link() {
                    content.trim().to_string()
                } else {
                    content
                };
            }
            ctx.api.update_card(card)?
        }
    };
    print_result(&result);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, kind: KindArg, indexes: &[String]) -> Result<()> {
    let result = match kind {
        KindArg::Note => ctx.api.delete::<Note, _>(indexes)?,
        KindArg::Card => ctx.api.delete::<Card, _>(indexes)?,
    };
    print_result(&result);
    if let Some(toast) = render_toast(ctx.api.toast_state()) {
        print!("{}", toast);
    }
    Ok(())
}

fn handle_dismiss(ctx: &mut AppContext) {
    if ctx.api.dismiss_toast() {
        println!("{}", "Notification dismissed.".dimmed());
    } else {
        println!("{}", "No notification to dismiss.".dimmed());
    }
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.configure(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_result(&result);
    Ok(())
}

fn handle_help(command: Option<&str>) {
    match command {
        None => print!("{}", get_grouped_help()),
        Some(name) => match help_for_command(name) {
            Some(help) => print!("{}", help),
            None => {
                eprintln!("Unknown command: {}", name);
                print!("{}", get_grouped_help());
            }
        },
    }
}

fn handle_preview(ctx: &mut AppContext, outcome: PreviewOutcome) {
    let card_id = outcome.card_id;
    let ready = matches!(outcome.state, PreviewState::Ready(_));
    if !ctx.api.apply_preview(outcome) || !ready {
        return;
    }
    if let Some(card) = ctx.api.store().get::<Card>(Location::Active, card_id) {
        println!();
        println!("{}", format!("Preview ready for card '{}'.", card.title).dimmed());
        prompt(ctx);
    }
}
