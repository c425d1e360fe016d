//! Markdown table rendering shared by the Word and spreadsheet extractors.

/// Render rows as a pipe table.
///
/// The first row is the header; the `| --- |` separator after it is sized to
/// the header's cell count. Later rows are written as-is, so a row wider or
/// narrower than the header stays that way. Rows with no cells are skipped.
/// Returns an empty string when there is nothing to render.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    for row in rows.iter().filter(|r| !r.is_empty()) {
        lines.push(render_row(row));
        if lines.len() == 1 {
            lines.push(separator(row.len()));
        }
    }
    lines.join("\n")
}

/// Make a grid rectangular: drop trailing blank rows, drop trailing columns
/// that are blank in every row, then pad every row to the remaining width.
pub fn rectangularize(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    while rows.last().is_some_and(|r| is_blank_row(r)) {
        rows.pop();
    }
    let width = rows
        .iter()
        .filter_map(|r| r.iter().rposition(|c| !c.trim().is_empty()))
        .map(|last| last + 1)
        .max()
        .unwrap_or(0);
    if width == 0 {
        return Vec::new();
    }
    for row in rows.iter_mut() {
        row.resize(width, String::new());
    }
    rows
}

/// True when every cell is empty or whitespace.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Escape a cell so it cannot break the table structure.
pub fn escape_cell(cell: &str) -> String {
    cell.trim()
        .replace('\r', "")
        .replace('\n', " ")
        .replace('|', "\\|")
}

fn render_row(row: &[String]) -> String {
    let mut out = String::from("|");
    for cell in row {
        out.push(' ');
        out.push_str(&escape_cell(cell));
        out.push_str(" |");
    }
    out
}

fn separator(cols: usize) -> String {
    let mut out = String::from("|");
    for _ in 0..cols {
        out.push_str(" --- |");
    }
    out
}
