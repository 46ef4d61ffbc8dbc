use std::path::PathBuf;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

use crate::export::ExportError;
use crate::record::Record;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse record collection: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Everything the update loop reacts to: key presses mapped by the
/// controller plus the loader emissions coming in over the channel.
#[derive(Debug)]
pub enum Message {
    Quit,
    RecordsLoaded(Vec<Record>),
    LoadFailed(String),
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    SortAscending,
    SortDescending,
    EnterFilter,
    ToggleColumns,
    Select,
    Export,
    Help,
    Exit,
    RawKey(KeyEvent),
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct RosterConfig {
    pub data_path: PathBuf,
    pub page_size: usize,
    pub event_poll_ms: u64,
    pub seed: Option<u64>,
    pub font_dir: PathBuf,
    pub font_name: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_path: "tests/fixtures/users.json".into(),
            page_size: 10,
            event_poll_ms: 100,
            seed: None,
            font_dir: "/usr/share/fonts/truetype/liberation".into(),
            font_name: "LiberationSans".to_string(),
        }
    }
}

pub const HELP_TEXT: &str = "\
roster keys

  Up/Down, k/j     select row
  Left/Right, h/l  select column
  PgDn/PgUp, n/p   next / previous page
  Home/End         first / last page
  Enter            expand or collapse the selected row
  s / S            sort by selected column, ascending / descending
  /                filter (typing narrows the table live, Esc clears)
  c                show or hide columns
  x                export the full roster as PDF
  ?                this help
  q                quit
";
