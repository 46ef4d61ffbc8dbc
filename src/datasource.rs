//! Filter, sort and pagination over the loaded record collection.
//!
//! The collection itself is kept intact; filtering and sorting only
//! rearrange an index vector, the same way the table views in tv map view
//! rows onto data rows.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::debug;

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Username,
    Email,
    Phone,
    Salary,
}

impl SortField {
    pub fn from_column(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "username" => Some(Self::Username),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "salary" => Some(Self::Salary),
            _ => None,
        }
    }
}

pub struct DataSource {
    records: Vec<Record>,
    filter: String,
    visible: Vec<usize>,
    page: usize,
    page_size: usize,
}

impl DataSource {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            filter: String::new(),
            visible: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Swap in a freshly loaded collection. The page index is forced back
    /// to zero so the view never initializes onto a stale page.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.rebuild();
        self.page = 0;
    }

    /// Case-insensitive substring filter across all record fields. Every
    /// change resets pagination to the first page; an empty or whitespace
    /// value shows the whole collection.
    pub fn set_filter(&mut self, raw: &str) {
        self.filter = raw.trim().to_lowercase();
        self.rebuild();
        self.page = 0;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    fn rebuild(&mut self) {
        if self.filter.is_empty() {
            self.visible = (0..self.records.len()).collect();
        } else {
            let needle = self.filter.as_str();
            self.visible = self
                .records
                .par_iter()
                .enumerate()
                .filter(|(_, r)| Self::matches(r, needle))
                .map(|(i, _)| i)
                .collect();
        }
        debug!(
            "Filter \"{}\": {}/{} rows",
            self.filter,
            self.visible.len(),
            self.records.len()
        );
    }

    fn matches(record: &Record, needle: &str) -> bool {
        record.id.to_lowercase().contains(needle)
            || record.name.to_lowercase().contains(needle)
            || record.username.to_lowercase().contains(needle)
            || record.email.to_lowercase().contains(needle)
            || record.phone.to_lowercase().contains(needle)
            || record.salary.to_string().contains(needle)
    }

    /// Reorder the visible rows by one field. Identifiers sort numerically
    /// when both sides parse, numbers before non-numbers otherwise.
    pub fn sort_by(&mut self, field: SortField, ascending: bool) {
        let records = &self.records;
        self.visible.sort_by(|&a, &b| {
            let ord = Self::compare(&records[a], &records[b], field);
            if ascending { ord } else { ord.reverse() }
        });
    }

    fn compare(a: &Record, b: &Record, field: SortField) -> Ordering {
        match field {
            SortField::Id => match (a.id.parse::<f64>(), b.id.parse::<f64>()) {
                (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.id.cmp(&b.id),
            },
            SortField::Name => a.name.cmp(&b.name),
            SortField::Username => a.username.cmp(&b.username),
            SortField::Email => a.email.cmp(&b.email),
            SortField::Phone => a.phone.cmp(&b.phone),
            SortField::Salary => a.salary.partial_cmp(&b.salary).unwrap_or(Ordering::Equal),
        }
    }

    pub fn row_count(&self) -> usize {
        self.visible.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size).max(1)
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.page_count() - 1;
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// The rows of the current page, each paired with its index into the
    /// underlying collection.
    pub fn page_rows(&self) -> Vec<(usize, &Record)> {
        let begin = (self.page * self.page_size).min(self.visible.len());
        let end = (begin + self.page_size).min(self.visible.len());
        self.visible[begin..end]
            .iter()
            .map(|&idx| (idx, &self.records[idx]))
            .collect()
    }

    /// Flip one record's detail-row flag. Every call toggles; there is no
    /// no-op transition.
    pub fn toggle_expanded(&mut self, idx: usize) {
        if let Some(record) = self.records.get_mut(idx) {
            record.expanded = !record.expanded;
        }
    }

    /// The full underlying collection, ignoring filter, sort and paging.
    /// This is what the export sees.
    pub fn all_records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
