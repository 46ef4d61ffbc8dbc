use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, info};

use crate::columns::{ColumnDef, ColumnLayout, ToggleEntry, column, toggle_entries};
use crate::datasource::{DataSource, SortField};
use crate::domain::{HELP_TEXT, Message, RosterConfig};
use crate::enrich::enrich_records;
use crate::export::{self, PdfRenderer};
use crate::inputter::{FilterInput, InputOutcome};
use crate::record::Record;

#[derive(Debug, PartialEq)]
pub enum Status {
    LOADING,
    READY,
    QUITTING,
}

/// Which surface currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modus {
    TABLE,
    COLUMNS,
    FILTER,
    HELP,
}

pub struct Model {
    pub status: Status,
    modus: Modus,
    datasource: DataSource,
    layout: ColumnLayout,
    toggles: Vec<ToggleEntry>,
    toggle_cursor: usize,
    total_salaries: f64,
    cursor_row: usize,
    sort_cursor: usize,
    sort: Option<(SortField, bool)>,
    input: FilterInput,
    renderer: Box<dyn PdfRenderer>,
    rng: StdRng,
    status_message: String,
}

impl Model {
    pub fn init(config: RosterConfig, renderer: Box<dyn PdfRenderer>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let datasource = DataSource::new(config.page_size);
        Self {
            status: Status::LOADING,
            modus: Modus::TABLE,
            datasource,
            layout: ColumnLayout::new(),
            toggles: toggle_entries(),
            toggle_cursor: 0,
            total_salaries: 0.0,
            cursor_row: 0,
            sort_cursor: 1, // first sortable column, right of the expand marker
            sort: None,
            input: FilterInput::default(),
            renderer,
            rng,
            status_message: "Loading records ...".to_string(),
        }
    }

    /// While the filter box is open, keys go to it verbatim.
    pub fn raw_keyevents(&self) -> bool {
        self.input.is_active()
    }

    pub fn update(&mut self, message: Message) {
        match message {
            // Loader emissions arrive whatever surface is active.
            Message::RecordsLoaded(records) => self.records_loaded(records),
            Message::LoadFailed(err) => self.load_failed(err),
            Message::Quit => self.quit(),
            Message::RawKey(key) => self.raw_input(key),
            msg => match self.modus {
                Modus::TABLE => self.update_table(msg),
                Modus::COLUMNS => self.update_columns(msg),
                Modus::HELP => {
                    if matches!(msg, Message::Exit | Message::Help | Message::Select) {
                        self.modus = Modus::TABLE;
                    }
                }
                // All filter-mode keys come in as RawKey.
                Modus::FILTER => {}
            },
        }
    }

    fn update_table(&mut self, message: Message) {
        match message {
            Message::MoveUp => self.move_cursor(-1),
            Message::MoveDown => self.move_cursor(1),
            Message::MoveLeft => self.move_sort_cursor(-1),
            Message::MoveRight => self.move_sort_cursor(1),
            Message::NextPage => {
                self.datasource.next_page();
                self.clamp_cursor();
            }
            Message::PrevPage => {
                self.datasource.prev_page();
                self.clamp_cursor();
            }
            Message::FirstPage => {
                self.datasource.first_page();
                self.clamp_cursor();
            }
            Message::LastPage => {
                self.datasource.last_page();
                self.clamp_cursor();
            }
            Message::SortAscending => self.sort_current(true),
            Message::SortDescending => self.sort_current(false),
            Message::Select => self.expand_collapse(),
            Message::EnterFilter => {
                self.modus = Modus::FILTER;
                self.input.open();
            }
            Message::ToggleColumns => {
                self.modus = Modus::COLUMNS;
                self.toggle_cursor = 0;
            }
            Message::Export => self.export_roster(),
            Message::Help => self.modus = Modus::HELP,
            Message::Exit => {
                // Esc in the table clears an active filter.
                if !self.datasource.filter().is_empty() {
                    self.input.clear();
                    self.apply_filter();
                }
            }
            _ => (),
        }
    }

    fn update_columns(&mut self, message: Message) {
        match message {
            Message::MoveUp => {
                self.toggle_cursor = self.toggle_cursor.saturating_sub(1);
            }
            Message::MoveDown => {
                if self.toggle_cursor + 1 < self.toggles.len() {
                    self.toggle_cursor += 1;
                }
            }
            Message::Select => self.toggle_entry(),
            Message::ToggleColumns | Message::Exit => self.modus = Modus::TABLE,
            _ => (),
        }
    }

    // ------------------------- loader wiring --------------------------- //

    /// One emission of the record collaborator: enrich, recompute the
    /// total, rewire the data source. Runs again in full for every
    /// further emission.
    fn records_loaded(&mut self, mut records: Vec<Record>) {
        let count = records.len();
        self.total_salaries = enrich_records(&mut records, &mut self.rng);
        self.datasource.set_records(records);
        if let Some((field, ascending)) = self.sort {
            self.datasource.sort_by(field, ascending);
        }
        self.cursor_row = 0;
        self.status = Status::READY;
        info!("Loaded {count} records, salary total {:.2}", self.total_salaries);
        self.set_status_message(format!("Loaded {count} records"));
    }

    /// The previously loaded collection stays untouched; the failure only
    /// surfaces in the status line.
    fn load_failed(&mut self, err: String) {
        self.status = Status::READY;
        self.set_status_message(format!("Loading failed: {err}"));
    }

    // ------------------------- table handling -------------------------- //

    fn move_cursor(&mut self, step: isize) {
        let rows = self.datasource.page_rows().len();
        if rows == 0 {
            self.cursor_row = 0;
            return;
        }
        if step < 0 {
            self.cursor_row = self.cursor_row.saturating_sub(step.unsigned_abs());
        } else {
            self.cursor_row = (self.cursor_row + step as usize).min(rows - 1);
        }
    }

    fn clamp_cursor(&mut self) {
        let rows = self.datasource.page_rows().len();
        self.cursor_row = self.cursor_row.min(rows.saturating_sub(1));
    }

    fn move_sort_cursor(&mut self, step: isize) {
        let columns = self.layout.displayed().len();
        if columns == 0 {
            return;
        }
        if step < 0 {
            self.sort_cursor = self.sort_cursor.saturating_sub(step.unsigned_abs());
        } else {
            self.sort_cursor = (self.sort_cursor + step as usize).min(columns - 1);
        }
    }

    fn sort_current(&mut self, ascending: bool) {
        if let Some(name) = self.layout.displayed().get(self.sort_cursor)
            && let Some(field) = SortField::from_column(name)
        {
            self.datasource.sort_by(field, ascending);
            self.sort = Some((field, ascending));
            self.cursor_row = 0;
            debug!("Sorted by {field:?}, ascending: {ascending}");
        }
    }

    /// Flip the detail row of the record under the cursor.
    fn expand_collapse(&mut self) {
        let idx = self
            .datasource
            .page_rows()
            .get(self.cursor_row)
            .map(|&(idx, _)| idx);
        if let Some(idx) = idx {
            self.datasource.toggle_expanded(idx);
        }
    }

    // ----------------------- filter and columns ------------------------ //

    fn raw_input(&mut self, key: KeyEvent) {
        if !self.input.is_active() {
            return;
        }
        match self.input.read(key) {
            InputOutcome::Edited => self.apply_filter(),
            InputOutcome::Submitted => {
                self.input.close();
                self.modus = Modus::TABLE;
            }
            InputOutcome::Cancelled => {
                self.apply_filter();
                self.input.close();
                self.modus = Modus::TABLE;
            }
            InputOutcome::Ignored => {}
        }
    }

    fn apply_filter(&mut self) {
        self.datasource.set_filter(self.input.text());
        self.cursor_row = 0;
    }

    fn toggle_entry(&mut self) {
        if let Some(entry) = self.toggles.get_mut(self.toggle_cursor) {
            entry.active = !entry.active;
            self.layout.toggle(&entry.name, entry.active, entry.position);
            let columns = self.layout.displayed().len();
            self.sort_cursor = self.sort_cursor.min(columns.saturating_sub(1));
        }
    }

    // ------------------------------ export ----------------------------- //

    /// Export the full underlying collection; filter, sort and paging are
    /// not consulted. On failure nothing but the status line changes.
    fn export_roster(&mut self) {
        match export::render_document(self.datasource.all_records(), self.renderer.as_ref()) {
            Ok(bytes) => match export::write_and_open(&bytes) {
                Ok(path) => self.set_status_message(format!("Exported {}", path.display())),
                Err(e) => self.set_status_message(format!("Export failed: {e}")),
            },
            Err(e) => self.set_status_message(format!("Export failed: {e}")),
        }
    }

    // ----------------------------- queries ----------------------------- //

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn modus(&self) -> Modus {
        self.modus
    }

    pub fn displayed_columns(&self) -> Vec<&'static ColumnDef> {
        self.layout
            .displayed()
            .iter()
            .filter_map(|name| column(name))
            .collect()
    }

    pub fn page_rows(&self) -> Vec<(usize, &Record)> {
        self.datasource.page_rows()
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn sort_cursor(&self) -> usize {
        self.sort_cursor
    }

    pub fn sort(&self) -> Option<(SortField, bool)> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.datasource.page()
    }

    pub fn page_count(&self) -> usize {
        self.datasource.page_count()
    }

    pub fn row_count(&self) -> usize {
        self.datasource.row_count()
    }

    pub fn staff_count(&self) -> usize {
        self.datasource.all_records().len()
    }

    pub fn total_salaries(&self) -> f64 {
        self.total_salaries
    }

    pub fn filter_text(&self) -> &str {
        self.input.text()
    }

    pub fn filter_cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn toggles(&self) -> &[ToggleEntry] {
        &self.toggles
    }

    pub fn toggle_cursor(&self) -> usize {
        self.toggle_cursor
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn help_text(&self) -> &'static str {
        HELP_TEXT
    }
}
