use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

use crate::columns::ColumnDef;
use crate::export::format_usd;
use crate::model::{Model, Modus, Status};
use crate::record::Record;

pub const SUMMARY_HEIGHT: u16 = 1;
pub const STATUSLINE_HEIGHT: u16 = 1;

pub fn draw(model: &Model, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(SUMMARY_HEIGHT),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .split(frame.area());

    render_table(frame, model, chunks[0]);
    render_summary(frame, model, chunks[1]);
    render_statusline(frame, model, chunks[2]);

    match model.modus() {
        Modus::COLUMNS => render_columns_panel(frame, model),
        Modus::HELP => render_help(frame, model),
        _ => {}
    }
}

fn column_width(column: &ColumnDef) -> u16 {
    match column.name {
        "expand" => 3,
        "id" => 6,
        "name" => 24,
        "username" => 18,
        "email" => 28,
        "phone" => 22,
        "salary" => 12,
        _ => 12,
    }
}

fn cell_text(record: &Record, column: &ColumnDef) -> String {
    match column.name {
        "expand" => {
            let glyph = match (record.has_details, record.expanded) {
                (false, _) => " ",
                (true, false) => "▸",
                (true, true) => "▾",
            };
            glyph.to_string()
        }
        "id" => record.id.clone(),
        "name" => record.name.clone(),
        "username" => record.username.clone(),
        "email" => record.email.clone(),
        "phone" => record.phone.clone(),
        "salary" => format_usd(record.salary),
        _ => String::new(),
    }
}

fn detail_text(record: &Record, column: &ColumnDef) -> String {
    match column.name {
        "name" => {
            if record.has_details {
                "⤷ detail file available".to_string()
            } else {
                "⤷ no detail file".to_string()
            }
        }
        "salary" => format_usd(record.salary),
        _ => String::new(),
    }
}

fn render_table(frame: &mut Frame, model: &Model, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" roster ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let page_rows = model.page_rows();
    if page_rows.is_empty() {
        let message = match model.status {
            Status::LOADING => "Loading records ...",
            _ if model.staff_count() == 0 => "No records loaded.",
            _ => "No rows match the filter.",
        };
        frame.render_widget(Paragraph::new(message), inner);
        return;
    }

    let columns = model.displayed_columns();
    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|c| Constraint::Length(column_width(c)))
        .collect();

    let sorted = model.sort();
    let header_cells: Vec<Cell> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let style = if i == model.sort_cursor() {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let label = match sorted {
                Some((field, ascending))
                    if crate::datasource::SortField::from_column(c.name) == Some(field) =>
                {
                    format!("{} {}", c.label, if ascending { "▲" } else { "▼" })
                }
                _ => c.label.to_string(),
            };
            Cell::from(label).style(style)
        })
        .collect();
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let mut rows: Vec<Row> = Vec::with_capacity(page_rows.len() * 2);
    for (i, (_, record)) in page_rows.iter().enumerate() {
        let selected = i == model.cursor_row();
        let style = if selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let cells: Vec<Cell> = columns
            .iter()
            .map(|c| Cell::from(cell_text(record, c)))
            .collect();
        rows.push(Row::new(cells).style(style));

        if record.expanded {
            let detail_cells: Vec<Cell> = columns
                .iter()
                .map(|c| Cell::from(detail_text(record, c)))
                .collect();
            rows.push(
                Row::new(detail_cells)
                    .style(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC)),
            );
        }
    }

    let table = Table::new(rows, constraints).header(header);
    frame.render_widget(table, inner);
}

fn render_summary(frame: &mut Frame, model: &Model, area: Rect) {
    let line = Line::from(vec![
        Span::raw("Total salaries: "),
        Span::styled(
            format_usd(model.total_salaries()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " · {} staff · {} rows · page {}/{}",
            model.staff_count(),
            model.row_count(),
            model.page() + 1,
            model.page_count()
        )),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_statusline(frame: &mut Frame, model: &Model, area: Rect) {
    let line = if model.modus() == Modus::FILTER {
        let text = model.filter_text();
        let cursor = model.filter_cursor();
        let before: String = text.chars().take(cursor).collect();
        let after: String = text.chars().skip(cursor).collect();
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(before),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::raw(after),
        ])
    } else if !model.filter_text().is_empty() {
        Line::from(format!(
            "{}  [filter: {}]",
            model.status_message(),
            model.filter_text()
        ))
    } else {
        Line::from(model.status_message())
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_columns_panel(frame: &mut Frame, model: &Model) {
    let height = model.toggles().len() as u16 + 2;
    let area = centered_rect(30, height, frame.area());
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = model
        .toggles()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if entry.active { "[x]" } else { "[ ]" };
            let style = if i == model.toggle_cursor() {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Line::styled(format!(" {marker} {}", entry.label), style)
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Columns (Enter toggles) "),
    );
    frame.render_widget(panel, area);
}

fn render_help(frame: &mut Frame, model: &Model) {
    let text = model.help_text();
    let height = text.lines().count() as u16 + 2;
    let area = centered_rect(48, height, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help "),
    );
    frame.render_widget(popup, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
