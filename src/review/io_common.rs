use std::path::Path;

use crate::review::{ParsedRespondent, IDENTITY_COLUMN};

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn infer_input_type(path: &str) -> String {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls") => {
            "xlsx".to_string()
        }
        _ => "csv".to_string(),
    }
}

/// Builds one respondent from the header labels and the cells of a data row.
/// The identity column is routed to the name; blank labels and unanswered
/// cells are skipped. Returns `None` for fully blank rows.
pub fn assemble_respondent(
    labels: &[Option<String>],
    cells: &[Option<String>],
) -> Option<ParsedRespondent> {
    let mut name: Option<String> = None;
    let mut answers: Vec<(String, String)> = Vec::new();
    for (col, label) in labels.iter().enumerate() {
        let label = match label {
            Some(l) => l,
            None => continue,
        };
        let value = match cells.get(col).and_then(|c| c.as_ref()) {
            Some(v) => v,
            None => continue,
        };
        if label == IDENTITY_COLUMN {
            name = Some(value.clone());
        } else {
            answers.push((label.clone(), value.clone()));
        }
    }
    if name.is_none() && answers.is_empty() {
        None
    } else {
        Some(ParsedRespondent { name, answers })
    }
}
