use crate::commands::{CmdMessage, CmdResult};
use crate::config::NotecaseConfig;
use crate::error::{NotecaseError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Shows or changes configuration; a successful `Set` is saved to `dir`.
pub fn run(config: &mut NotecaseConfig, dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => Ok(CmdResult::default().with_config(config.clone())),
        ConfigAction::ShowKey(key) => {
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut updated = config.clone();
            if let Err(e) = updated.set(&key, &value) {
                let mut result = CmdResult::default();
                let message = match e {
                    NotecaseError::Config(reason) => reason,
                    other => other.to_string(),
                };
                result.add_message(CmdMessage::error(message));
                return Ok(result);
            }
            updated.save(dir)?;
            *config = updated;

            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config.clone());
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}
