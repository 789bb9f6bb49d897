// Primitives for reading CSV files.

use log::debug;
use snafu::prelude::*;

use crate::review::io_common::assemble_respondent;
use crate::review::*;

pub fn read_csv_respondents(path: &str) -> RvResult<Vec<ParsedRespondent>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu {})?;
    let mut records = rdr.into_records();

    let labels: Vec<Option<String>> = match records.next() {
        Some(header) => header
            .context(CsvLineParseSnafu {})?
            .iter()
            .map(trimmed_cell)
            .collect(),
        None => return Ok(Vec::new()),
    };
    debug!("read_csv_respondents: header: {:?}", labels);

    let mut res: Vec<ParsedRespondent> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu {})?;
        let cells: Vec<Option<String>> = line.iter().map(trimmed_cell).collect();
        if let Some(parsed) = assemble_respondent(&labels, &cells) {
            debug!(
                "read_csv_respondents: lineno: {:?} name: {:?}",
                lineno, parsed.name
            );
            res.push(parsed);
        }
    }
    Ok(res)
}

fn trimmed_cell(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
