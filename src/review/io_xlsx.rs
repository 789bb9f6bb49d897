use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use crate::review::io_common::assemble_respondent;
use crate::review::*;

/// Reads the first worksheet of an Excel workbook: header row of question
/// labels, one respondent per following row.
pub fn read_xlsx_respondents(path: &str) -> RvResult<Vec<ParsedRespondent>> {
    let wrange = get_range(path)?;
    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu { path })?;
    let labels: Vec<Option<String>> = header.iter().map(header_label).collect();
    debug!("read_xlsx_respondents: header: {:?}", labels);

    let mut res: Vec<ParsedRespondent> = Vec::new();
    for (idx, row) in rows.enumerate() {
        // Rows are 1-based in the spreadsheet world and the header is row 1.
        let lineno = (idx + 2) as u64;
        let mut cells: Vec<Option<String>> = Vec::new();
        for cell in row {
            cells.push(cell_value(cell, lineno)?);
        }
        if let Some(parsed) = assemble_respondent(&labels, &cells) {
            debug!("read_xlsx_respondents: row {}: {:?}", lineno, parsed.name);
            res.push(parsed);
        }
    }
    Ok(res)
}

fn get_range(path: &str) -> RvResult<calamine::Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}

fn header_label(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn cell_value(cell: &DataType, lineno: u64) -> RvResult<Option<String>> {
    match cell {
        DataType::String(s) if s.is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.clone())),
        DataType::Float(f) => Ok(Some(f.to_string())),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Bool(b) => Ok(Some(b.to_string())),
        DataType::Empty => Ok(None),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}
