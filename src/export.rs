//! PDF export of the full roster.
//!
//! The export projects the underlying record collection (never the
//! filtered or paged view) into fixed header/body matrices and hands them
//! to a table-layout renderer. Rendering is behind a trait so the
//! projection logic stays testable without fonts or a PDF backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use genpdf::Element as _;
use genpdf::elements::{FrameCellDecorator, Paragraph, TableLayout};
use genpdf::{SimplePageDecorator, fonts, style};
use thiserror::Error;
use tracing::info;

use crate::columns::COLUMNS;
use crate::record::Record;

/// Relative column widths handed to the table layout, one per printable
/// column: narrow id, wide identity fields, medium salary.
pub const PDF_COLUMN_WEIGHTS: [usize; 6] = [10, 40, 40, 40, 40, 20];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("pdf generation failed: {0}")]
    Pdf(#[from] genpdf::error::Error),
    #[error("cannot write document: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open document viewer: {0}")]
    Viewer(#[from] opener::OpenError),
}

/// One header row: the display labels of every printable column, in
/// declared order.
pub fn printable_header() -> Vec<Vec<String>> {
    vec![
        COLUMNS
            .iter()
            .filter(|c| c.printable)
            .map(|c| c.label.to_string())
            .collect(),
    ]
}

/// One body row per record: exactly six fields, salary as localized USD.
pub fn export_body(records: &[Record]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.name.clone(),
                r.username.clone(),
                r.email.clone(),
                r.phone.clone(),
                format_usd(r.salary),
            ]
        })
        .collect()
}

/// Symbol form, thousands separators, two decimals: 2500.5 -> "$2,500.50".
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let whole: String = grouped.chars().rev().collect();

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${whole}.{fraction:02}")
}

/// The external table-layout/PDF capability.
pub trait PdfRenderer {
    fn render(
        &self,
        header: &[Vec<String>],
        body: &[Vec<String>],
        weights: &[usize],
    ) -> Result<Vec<u8>, ExportError>;
}

/// genpdf-backed renderer: A4 portrait, 10pt, 10mm margins, framed table.
pub struct GenpdfRenderer {
    font_dir: PathBuf,
    font_name: String,
}

impl GenpdfRenderer {
    pub fn new(font_dir: PathBuf, font_name: String) -> Self {
        Self {
            font_dir,
            font_name,
        }
    }
}

impl PdfRenderer for GenpdfRenderer {
    fn render(
        &self,
        header: &[Vec<String>],
        body: &[Vec<String>],
        weights: &[usize],
    ) -> Result<Vec<u8>, ExportError> {
        let family = fonts::from_files(&self.font_dir, &self.font_name, None)?;
        let mut doc = genpdf::Document::new(family);
        doc.set_title("Staff roster");
        doc.set_paper_size(genpdf::PaperSize::A4);
        doc.set_font_size(10);
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        let mut table = TableLayout::new(weights.to_vec());
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
        let bold = style::Style::new().bold();
        for cells in header {
            let mut row = table.row();
            for cell in cells {
                row.push_element(Paragraph::new(cell.as_str()).styled(bold).padded(1));
            }
            row.push()?;
        }
        for cells in body {
            let mut row = table.row();
            for cell in cells {
                row.push_element(Paragraph::new(cell.as_str()).padded(1));
            }
            row.push()?;
        }
        doc.push(table);

        let mut bytes = Vec::new();
        doc.render(&mut bytes)?;
        Ok(bytes)
    }
}

/// Project the collection and render it. Failures propagate untouched;
/// the caller's record and display state are not involved.
pub fn render_document(
    records: &[Record],
    renderer: &dyn PdfRenderer,
) -> Result<Vec<u8>, ExportError> {
    let header = printable_header();
    let body = export_body(records);
    renderer.render(&header, &body, &PDF_COLUMN_WEIGHTS)
}

/// Write the rendered document next to the other temp files and hand it to
/// the system viewer instead of "downloading" it anywhere permanent.
pub fn write_and_open(bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let path = std::env::temp_dir().join(format!("roster-{stamp}.pdf"));
    fs::write(&path, bytes)?;
    info!("Wrote export to {}", path.display());
    present(&path)?;
    Ok(path)
}

fn present(path: &Path) -> Result<(), ExportError> {
    opener::open(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn record(id: &str, salary: f64) -> Record {
        Record {
            id: id.to_string(),
            name: "Leanne Graham".to_string(),
            username: "Bret".to_string(),
            email: "Sincere@april.biz".to_string(),
            phone: "1-770-736-8031 x56442".to_string(),
            salary,
            expanded: false,
            has_details: true,
        }
    }

    /// Records what it was asked to render.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Mutex<Vec<(Vec<Vec<String>>, Vec<Vec<String>>, Vec<usize>)>>,
    }

    impl PdfRenderer for RecordingRenderer {
        fn render(
            &self,
            header: &[Vec<String>],
            body: &[Vec<String>],
            weights: &[usize],
        ) -> Result<Vec<u8>, ExportError> {
            self.calls
                .lock()
                .unwrap()
                .push((header.to_vec(), body.to_vec(), weights.to_vec()));
            Ok(b"%PDF-stub".to_vec())
        }
    }

    struct FailingRenderer;

    impl PdfRenderer for FailingRenderer {
        fn render(
            &self,
            _header: &[Vec<String>],
            _body: &[Vec<String>],
            _weights: &[usize],
        ) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Io(std::io::Error::other("boom")))
        }
    }

    #[test]
    fn usd_formatting_matches_the_locale_form() {
        assert_eq!(format_usd(2500.5), "$2,500.50");
        assert_eq!(format_usd(10000.0), "$10,000.00");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(1234567.89), "$1,234,567.89");
        assert_eq!(format_usd(-2500.5), "-$2,500.50");
    }

    #[test]
    fn header_lists_printable_labels_in_declared_order() {
        let header = printable_header();
        assert_eq!(header.len(), 1);
        assert_eq!(
            header[0],
            ["ID", "Name", "Username", "E-mail", "Phone", "Salary"]
        );
    }

    #[test]
    fn body_rows_carry_exactly_six_fields_in_order() {
        let body = export_body(&[record("1", 2500.5)]);
        assert_eq!(
            body,
            vec![vec![
                "1".to_string(),
                "Leanne Graham".to_string(),
                "Bret".to_string(),
                "Sincere@april.biz".to_string(),
                "1-770-736-8031 x56442".to_string(),
                "$2,500.50".to_string(),
            ]]
        );
    }

    #[test]
    fn exporting_nothing_yields_a_header_only_document() {
        let renderer = RecordingRenderer::default();
        render_document(&[], &renderer).unwrap();
        let calls = renderer.calls.lock().unwrap();
        let (header, body, weights) = &calls[0];
        assert_eq!(header[0].len(), 6);
        assert!(body.is_empty());
        assert_eq!(weights.as_slice(), &PDF_COLUMN_WEIGHTS[..]);
    }

    #[test]
    fn renderer_errors_propagate() {
        let records = [record("1", 2500.5)];
        assert!(render_document(&records, &FailingRenderer).is_err());
    }
}
