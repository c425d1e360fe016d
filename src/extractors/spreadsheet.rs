//! Spreadsheet extraction for `.xlsx` workbooks.
//!
//! Each sheet becomes a `## Sheet: {name}` section holding a Markdown table,
//! in workbook order, separated by the sheet-break marker. A sheet that
//! cannot be read gets a placeholder section; the other sheets are
//! unaffected.

use super::{DocumentExtractor, SHEET_BREAK};
use crate::error::{Doc2MdError, UnitError};
use crate::pipeline::normalize::normalize;
use crate::pipeline::table::{rectangularize, render_table};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Placeholder body for a sheet with no non-blank cells.
pub const EMPTY_SHEET_NOTE: &str = "*(Empty sheet)*";

/// Placeholder body for a sheet whose content could not be read.
pub const UNREADABLE_SHEET_NOTE: &str = "*(Unable to read sheet content)*";

/// Sheet-level access to a workbook.
pub trait SheetSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Cell grid of one sheet as display strings, row-major.
    fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<String>>, UnitError>;
}

/// A workbook opened with calamine.
pub struct CalamineWorkbook {
    workbook: Xlsx<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open(path: &Path) -> Result<Self, Doc2MdError> {
        let workbook: Xlsx<_> = open_workbook(path).map_err(|e| Doc2MdError::corrupt(path, e))?;
        Ok(Self { workbook })
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl SheetSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Vec<Vec<String>>, UnitError> {
        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| UnitError::Sheet {
                sheet: name.to_string(),
                detail: e.to_string(),
            })?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }
}

/// Extractor for `.xlsx` workbooks.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Render every sheet of `source`.
    pub fn extract_from<S: SheetSource + ?Sized>(&self, source: &mut S) -> String {
        let names = source.sheet_names();
        debug!("Workbook has {} sheets", names.len());
        let sections: Vec<String> = names
            .iter()
            .map(|name| {
                let rows = source.read_sheet(name);
                sheet_section(name, rows)
            })
            .collect();
        normalize(&sections.join(SHEET_BREAK))
    }
}

fn sheet_section(name: &str, rows: Result<Vec<Vec<String>>, UnitError>) -> String {
    match rows {
        Ok(rows) => {
            let rows = rectangularize(rows);
            if rows.is_empty() {
                format!("## Sheet: {name}\n{EMPTY_SHEET_NOTE}")
            } else {
                format!("## Sheet: {name}\n\n{}", render_table(&rows))
            }
        }
        Err(e) => {
            warn!("{e}");
            format!("## Sheet: {name}\n{UNREADABLE_SHEET_NOTE}")
        }
    }
}

impl DocumentExtractor for SpreadsheetExtractor {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn try_parse(&self, path: &Path) -> Result<String, Doc2MdError> {
        let mut workbook = CalamineWorkbook::open(path)?;
        Ok(self.extract_from(&mut workbook))
    }
}
