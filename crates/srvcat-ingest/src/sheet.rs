//! Reads the first worksheet of an uploaded workbook into rows of text.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::IngestError;

/// Returns every row of the first sheet, anchored at cell A1.
///
/// Trailing empty cells are dropped from each row so a row with missing
/// columns comes back short.
pub(crate) fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<String>>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoSheet)?
        .map_err(|e| IngestError::Unreadable(e.to_string()))?;

    Ok(range_to_rows(&range))
}

fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    // calamine ranges start at the first used cell, not A1.
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let lead_cols = first_col as usize;

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); first_row as usize];
    for cells in range.rows() {
        let mut row = vec![String::new(); lead_cols];
        row.extend(cells.iter().map(ToString::to_string));
        while row.last().is_some_and(|c| c.trim().is_empty()) {
            row.pop();
        }
        rows.push(row);
    }
    rows
}
