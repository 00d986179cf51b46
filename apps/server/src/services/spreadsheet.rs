// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory `.xlsx` serialization of a table.

use super::flatten::CellValue;
use super::table::Table;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

/// Download name of the exported workbook.
pub const XLSX_FILE_NAME: &str = "ifc_export.xlsx";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Errors from spreadsheet serialization.
#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("Workbook error: {0}")]
    Workbook(#[from] XlsxError),

    #[error("Table has {0} columns, more than a worksheet holds")]
    TooManyColumns(usize),

    #[error("Table has {0} rows, more than a worksheet holds")]
    TooManyRows(usize),
}

/// Worksheet limits: 16,384 columns and 1,048,576 rows including the header.
const MAX_COLUMNS: usize = 16_384;
const MAX_ROWS: usize = 1_048_576;

/// Serialize a table to a single-sheet workbook.
///
/// The header row holds the column names; cells keep their kind (numbers,
/// booleans, text) and nulls stay blank.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>, SpreadsheetError> {
    if table.columns().len() > MAX_COLUMNS {
        return Err(SpreadsheetError::TooManyColumns(table.columns().len()));
    }
    if table.len() >= MAX_ROWS {
        return Err(SpreadsheetError::TooManyRows(table.len()));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let r = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, r, col as u16, cell)?;
        }
    }

    let buffer = workbook.save_to_buffer()?;

    tracing::debug!(
        rows = table.len(),
        columns = table.columns().len(),
        bytes = buffer.len(),
        "Serialized table to xlsx"
    );

    Ok(buffer)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Integer(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Real(r) if r.is_finite() => {
            worksheet.write_number(row, col, *r)?;
        }
        CellValue::Real(r) => {
            worksheet.write_string(row, col, r.to_string())?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::flatten::{flatten, FlattenPolicy};
    use crate::services::test_fixtures::{SCENARIO_A, TWO_WALLS};
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use ifc_sheet_core::IfcModel;
    use std::io::Cursor;

    fn table_of(content: &str) -> Table {
        let model = IfcModel::parse(content).unwrap();
        let records = flatten(&model, "model.ifc", &FlattenPolicy::default()).unwrap();
        Table::from_records(&records)
    }

    fn read_back(bytes: Vec<u8>) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let sheet = workbook.sheet_names()[0].clone();
        workbook.worksheet_range(&sheet).unwrap()
    }

    #[test]
    fn test_round_trip_columns_and_rows() {
        let table = table_of(SCENARIO_A);
        let range = read_back(to_xlsx(&table).unwrap());

        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows.len(), table.len() + 1);

        let header: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, table.columns());
    }

    #[test]
    fn test_cells_keep_their_kind() {
        let table = table_of(TWO_WALLS);
        let range = read_back(to_xlsx(&table).unwrap());
        let width = table.column_index("Width").unwrap();
        let layers = table.column_index("Layers").unwrap();

        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows[1][width], Data::Float(0.25));
        assert_eq!(rows[1][layers], Data::Float(3.0));
        assert_eq!(rows[1][0], Data::String("wall-1".into()));
        // Slab row: no Width
        assert_eq!(rows[3][width], Data::Empty);
    }

    #[test]
    fn test_empty_table_is_valid_workbook() {
        let bytes = to_xlsx(&Table::default()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
