use crate::error::{NotecaseError, Result};
use crate::model::ItemId;
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

/// A note as laid out in an editor buffer: title line, blank line, content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContent {
    pub title: String,
    pub content: String,
}

impl EditorContent {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn to_buffer(&self) -> String {
        if self.content.is_empty() {
            format!("{}\n\n", self.title)
        } else {
            format!("{}\n\n{}", self.title, self.content)
        }
    }

    /// Parses a buffer back: the first non-blank line is the title, the rest
    /// (minus surrounding blank lines) is the content.
    pub fn from_buffer(buffer: &str) -> Self {
        let trimmed = buffer.trim_start_matches(['\n', '\r', ' ', '\t']);
        let (title, rest) = match trimmed.split_once('\n') {
            Some((title, rest)) => (title, rest),
            None => (trimmed, ""),
        };
        Self {
            title: title.trim().to_string(),
            content: rest.trim_matches(['\n', '\r']).trim_end().to_string(),
        }
    }
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.trim().is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in ["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok(fallback.to_string());
        }
    }

    Err(NotecaseError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    // $EDITOR may carry arguments, e.g. "code --wait".
    let mut words = shell_words::split(&editor)
        .map_err(|e| NotecaseError::Config(format!("Cannot parse editor '{}': {}", editor, e)))?
        .into_iter();
    let program = words
        .next()
        .ok_or_else(|| NotecaseError::Config("Editor command is empty".to_string()))?;

    let status = Command::new(&program)
        .args(words)
        .arg(path)
        .status()
        .map_err(|e| NotecaseError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(NotecaseError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    Ok(fs::read_to_string(path)?)
}

/// Opens an editor on `initial` through a temporary Markdown file.
pub fn edit_content(initial: &EditorContent) -> Result<EditorContent> {
    let temp_file = env::temp_dir().join(format!("notecase_edit_{}.md", ItemId::new().short()));

    fs::write(&temp_file, initial.to_buffer())?;
    let result = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    Ok(EditorContent::from_buffer(&result?))
}
