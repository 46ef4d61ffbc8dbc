//! Staff records and the collaborator that fetches them.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{Message, RosterError};

/// One staff member. The loader supplies the identity fields; `salary` and
/// the two UI flags are assigned after the fetch and never come off disk.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(skip)]
    pub expanded: bool,
    #[serde(skip)]
    pub has_details: bool,
}

/// The external collaborator: hands over a collection of partially
/// populated records. Implementations run on a background thread, so they
/// must be `Send`.
pub trait RecordLoader: Send + 'static {
    fn fetch(&self) -> Result<Vec<Record>, RosterError>;
}

/// Reads a JSON array of records from disk.
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn probe(path: &Path) -> Result<(), RosterError> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RosterError::FileNotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => RosterError::PermissionDenied(path.to_path_buf()),
            _ => RosterError::Io(e),
        })?;
        if !metadata.is_file() {
            return Err(RosterError::NotAFile(path.to_path_buf()));
        }
        Ok(())
    }
}

impl RecordLoader for JsonFileLoader {
    fn fetch(&self) -> Result<Vec<Record>, RosterError> {
        Self::probe(&self.path)?;
        let raw = fs::read_to_string(&self.path)?;
        let records: Vec<Record> = serde_json::from_str(&raw)?;
        Ok(records)
    }
}

/// Run the fetch on a background thread and report the outcome over the
/// channel. The receiver lives in the UI loop; once that loop has ended the
/// send fails and the emission dies here instead of reaching a torn-down
/// widget.
pub fn spawn_fetch(loader: impl RecordLoader, sender: Sender<Message>) {
    std::thread::spawn(move || {
        let message = match loader.fetch() {
            Ok(records) => {
                info!("Fetched {} records", records.len());
                Message::RecordsLoaded(records)
            }
            Err(e) => {
                warn!("Record fetch failed: {e}");
                Message::LoadFailed(e.to_string())
            }
        };
        let _ = sender.send(message);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn fixture_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/users.json")
    }

    #[test]
    fn loads_partially_populated_records() {
        let loader = JsonFileLoader::new(fixture_path());
        let records = loader.fetch().unwrap();
        assert!(!records.is_empty());

        let first = &records[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.name, "Leanne Graham");
        // Post-fetch fields stay at their defaults until enrichment runs.
        assert_eq!(first.salary, 0.0);
        assert!(!first.expanded);
        assert!(!first.has_details);
    }

    #[test]
    fn missing_file_reports_a_typed_error() {
        let loader = JsonFileLoader::new(PathBuf::from("/no/such/users.json"));
        match loader.fetch() {
            Err(RosterError::FileNotFound(_)) => {}
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn spawn_fetch_reports_over_the_channel() {
        let (tx, rx) = mpsc::channel();
        spawn_fetch(JsonFileLoader::new(fixture_path()), tx);
        match rx.recv().unwrap() {
            Message::RecordsLoaded(records) => assert_eq!(records.len(), 10),
            other => panic!("expected RecordsLoaded, got {other:?}"),
        }
    }

    #[test]
    fn spawn_fetch_survives_a_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        spawn_fetch(JsonFileLoader::new(fixture_path()), tx);
        // Nothing to assert; the send failure must not panic the thread.
    }
}
