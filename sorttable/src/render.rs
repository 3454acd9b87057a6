//! Template rendering for CLI output using outstanding

use console::{measure_text_width, Style};
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;
use sorttablelib::{Document, HeaderView, SortState, SortTableConfig, TableView};

/// Include template at compile time
const TABLES_TEMPLATE: &str = include_str!("../templates/tables.jinja");

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

/// `--output` value that serializes the document instead of the tables
pub const HTML_OUTPUT: &str = "html";

/// Values accepted by `--output`
pub const OUTPUT_NAMES: [&str; 6] = ["auto", "term", "text", "term-debug", "json", HTML_OUTPUT];

/// One table, pre-formatted for the template
#[derive(Debug, Serialize)]
struct TemplateTable {
    id: Option<String>,
    /// Padded header line, empty when the table has no header row
    header: String,
    /// Separator line (dashes)
    separator: String,
    /// Padded body rows
    rows: Vec<String>,
    /// Padded footer rows
    footer: Vec<String>,
}

/// Data context for the tables template
#[derive(Debug, Serialize)]
struct TablesContext {
    tables: Vec<TemplateTable>,
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new().add("header", Style::new().bold())
}

/// Map an `--output` value to an outstanding mode
pub fn parse_output_mode(name: &str) -> OutputMode {
    match name {
        "json" => OutputMode::Json,
        "text" => OutputMode::Text,
        "term-debug" => OutputMode::TermDebug,
        "term" => OutputMode::Term,
        _ => OutputMode::Auto,
    }
}

/// Header label with the direction glyph of an active sort
fn header_label(header: &HeaderView, config: &SortTableConfig) -> String {
    let icon = match header.state {
        SortState::Ascending => config.icon_ascending.trim(),
        SortState::Descending => config.icon_descending.trim(),
        SortState::Unsorted => return header.label.clone(),
    };
    format!("{} {}", header.label, icon)
}

/// Join cells padded to their column widths
fn format_row(cells: &[String], widths: &[usize]) -> String {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{:<width$}", cell, width = w)
        })
        .collect();
    line.join("  ").trim_end().to_string()
}

/// Convert a TableView to a TemplateTable, pre-formatting every line
fn to_template_table(view: &TableView, config: &SortTableConfig) -> TemplateTable {
    let labels: Vec<String> = view
        .headers
        .iter()
        .map(|h| header_label(h, config))
        .collect();

    let mut widths = vec![0; view.width()];
    for row in std::iter::once(&labels)
        .chain(view.rows.iter())
        .chain(view.footer.iter())
    {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(measure_text_width(cell));
        }
    }
    let separator = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));

    TemplateTable {
        id: view.id.clone(),
        header: if labels.is_empty() {
            String::new()
        } else {
            format_row(&labels, &widths)
        },
        separator,
        rows: view.rows.iter().map(|r| format_row(r, &widths)).collect(),
        footer: view.footer.iter().map(|r| format_row(r, &widths)).collect(),
    }
}

/// Render table views with outstanding: the template for terminal and text
/// modes, plain serialization for JSON.
pub fn render_tables(
    views: &[TableView],
    config: &SortTableConfig,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let theme = create_theme();

    if matches!(output_mode, OutputMode::Json) {
        return Ok(render_auto(TABLES_TEMPLATE, &views, &theme, output_mode)?);
    }

    let context = TablesContext {
        tables: views
            .iter()
            .map(|v| to_template_table(v, config))
            .collect(),
    };
    let rendered = render_with_output(TABLES_TEMPLATE, &context, &theme, output_mode)?;
    Ok(rendered)
}

/// Serialize the whole document back to HTML.
pub fn render_html(doc: &Document) -> String {
    doc.to_html(doc.root())
}
