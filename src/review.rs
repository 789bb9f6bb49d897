use log::{debug, info, warn};

use survey_review::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;
pub mod session;
pub mod state_file;

/// The distinguished header naming the identity column of a dataset.
pub const IDENTITY_COLUMN: &str = "Name";

/// Dataset attempted at startup when no explicit file was chosen.
pub const DEFAULT_DATASET: &str = "data/example.csv";

/// Default location of the durable review state.
pub const DEFAULT_STATE_FILE: &str = "reviews.json";

#[derive(Debug, Snafu)]
pub enum RvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Workbook {path} has no readable rows"))]
    EmptyExcel { path: String },
    #[snafu(display("Cell at line {lineno} has an unsupported type: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Could not open the csv file"))]
    CsvOpen { source: csv::Error },
    #[snafu(display("Could not parse a csv line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing json content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing to the console"))]
    Console { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RvResult<T> = Result<T, RvError>;

/// A respondent row as produced by the dataset readers, before identity
/// normalization.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRespondent {
    pub name: Option<String>,
    pub answers: Vec<(String, String)>,
}

impl ParsedRespondent {
    pub fn into_respondent(self) -> Respondent {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Respondent {
            name,
            answers: self.answers,
        }
    }
}

/// Reads a dataset into catalog records. The format is taken from
/// `input_type` when given, else inferred from the file extension.
pub fn read_dataset(path: &str, input_type: Option<&str>) -> RvResult<Vec<Respondent>> {
    let input_type = match input_type {
        Some(s) => s.to_string(),
        None => io_common::infer_input_type(path),
    };
    info!("read_dataset: reading {:?} as {}", path, input_type);
    let parsed = match input_type.as_str() {
        "xlsx" => io_xlsx::read_xlsx_respondents(path)?,
        "csv" => io_csv::read_csv_respondents(path)?,
        x => whatever!("Input type not implemented {:?}", x),
    };
    debug!("read_dataset: {} rows", parsed.len());
    Ok(parsed.into_iter().map(|p| p.into_respondent()).collect())
}

/// Assembles the application and runs either the batch summary or an
/// interactive session.
pub fn run_app(args: &Args) -> RvResult<()> {
    let state_path = args
        .state
        .clone()
        .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());
    let store = ReviewStore::hydrate(Box::new(state_file::FileState::open(&state_path)));

    let mut catalog = RespondentCatalog::new();
    let dataset_label: String;
    match &args.input {
        Some(path) => {
            dataset_label = io_common::simplify_file_name(path);
            let records = read_dataset(path, args.input_type.as_deref())?;
            catalog.load(records);
        }
        None => {
            // No explicit file chosen: try the default dataset, keep an empty
            // catalog on failure.
            dataset_label = io_common::simplify_file_name(DEFAULT_DATASET);
            match read_dataset(DEFAULT_DATASET, None) {
                Ok(records) => catalog.load(records),
                Err(e) => warn!("Failed to load default file: {}", e),
            }
        }
    }

    let mut controller = ViewController::new(catalog, store);
    if let Some(reviewer) = &args.reviewer {
        controller.set_reviewer(reviewer);
    }

    if args.summary || args.out.is_some() || args.reference.is_some() {
        run_summary(&controller, &dataset_label, args)
    } else {
        let stdin = std::io::stdin();
        session::run_session(&mut controller, stdin.lock(), std::io::stdout())
    }
}

/// Header of the exported summary JSON.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ExportInfo {
    pub dataset: String,
    pub respondents: usize,
    pub reviewers: usize,
}

fn run_summary(controller: &ViewController, dataset: &str, args: &Args) -> RvResult<()> {
    let table = build_summary(controller.catalog(), controller.store());

    if args.summary {
        let mut out = std::io::stdout();
        session::render_summary_table(&table, &mut out).context(ConsoleSnafu {})?;
    }

    let result_js = build_summary_js(&table, dataset);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js),
        Some(path) => fs::write(path, &pretty_js).context(WritingOutputSnafu { path })?,
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(reference) = &args.reference {
        let reference_js = read_reference(reference)?;
        let pretty_ref = serde_json::to_string_pretty(&reference_js).context(ParsingJsonSnafu {})?;
        if pretty_ref != pretty_js {
            warn!("Found differences with the reference summary");
            print_diff(pretty_ref.as_str(), pretty_js.as_str(), "\n");
            whatever!("Difference detected between produced summary and reference summary");
        }
    }
    Ok(())
}

/// Assembles the exported summary JSON: an info header, the sorted reviewer
/// list and one row per respondent in catalog order.
pub fn build_summary_js(table: &SummaryTable, dataset: &str) -> JSValue {
    let info = ExportInfo {
        dataset: dataset.to_string(),
        respondents: table.rows.len(),
        reviewers: table.reviewers.len(),
    };
    let rows: Vec<JSValue> = table
        .rows
        .iter()
        .map(|row| {
            let mut reviews: JSMap<String, JSValue> = JSMap::new();
            for (reviewer, cell) in table.reviewers.iter().zip(row.cells.iter()) {
                let status = cell.status.map(|s| s.to_string()).unwrap_or_default();
                reviews.insert(
                    reviewer.clone(),
                    json!({"status": status, "comment": cell.comment}),
                );
            }
            json!({
                "name": row.name.clone().unwrap_or_default(),
                "reviews": reviews
            })
        })
        .collect();
    json!({"info": info, "reviewers": table.reviewers, "rows": rows})
}

pub fn read_reference(path: &str) -> RvResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn respondent(name: &str, answers: &[(&str, &str)]) -> Respondent {
        Respondent {
            name: Some(name.to_string()),
            answers: answers
                .iter()
                .map(|(q, a)| (q.to_string(), a.to_string()))
                .collect(),
        }
    }

    fn sample_catalog() -> RespondentCatalog {
        let mut catalog = RespondentCatalog::new();
        catalog.load(vec![
            respondent("Alice", &[("Q1", "yes")]),
            respondent("Bob", &[("Q1", "no")]),
        ]);
        catalog
    }

    fn memory_store() -> ReviewStore {
        ReviewStore::hydrate(Box::new(MemoryState::default()))
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("svreview_{}_{}", std::process::id(), name))
    }

    #[test]
    fn status_then_comment_roundtrip() {
        let mut store = memory_store();
        store.set_status("Alice", "Pat", ReviewStatus::Tentative);
        assert_eq!(
            store.get("Alice", "Pat").and_then(|r| r.status),
            Some(ReviewStatus::Tentative)
        );
        store.set_comment("Alice", "Pat", "needs a second look");
        let record = store.get("Alice", "Pat").unwrap();
        assert_eq!(record.status, Some(ReviewStatus::Tentative));
        assert_eq!(record.comment, "needs a second look");
    }

    #[test]
    fn blank_reviewer_is_ignored() {
        let mut store = memory_store();
        store.set_status("Alice", "", ReviewStatus::Approved);
        store.set_status("Alice", "   ", ReviewStatus::Approved);
        store.set_comment("Alice", "\t", "should not stick");
        assert!(store.get_all("Alice").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn persisted_state_survives_restart() {
        let mut store = memory_store();
        store.set_status("Alice", "Pat", ReviewStatus::Approved);
        store.set_comment("Bob", "Sam", "on the fence");

        let payload = store.state_mut().get(STATE_KEY).unwrap();
        let reloaded = ReviewStore::hydrate(Box::new(MemoryState::preloaded(STATE_KEY, &payload)));
        assert_eq!(store, reloaded);
    }

    #[test]
    fn state_file_survives_restart() {
        let path = temp_path("state_roundtrip.json");
        let _ = fs::remove_file(&path);
        {
            let state = state_file::FileState::open(&path);
            let mut store = ReviewStore::hydrate(Box::new(state));
            store.set_status("Alice", "Pat", ReviewStatus::Declined);
            store.set_comment("Alice", "Pat", "incomplete answers");
        }
        let reloaded = ReviewStore::hydrate(Box::new(state_file::FileState::open(&path)));
        let record = reloaded.get("Alice", "Pat").unwrap();
        assert_eq!(record.status, Some(ReviewStatus::Declined));
        assert_eq!(record.comment, "incomplete answers");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_state_starts_empty() {
        let store =
            ReviewStore::hydrate(Box::new(MemoryState::preloaded(STATE_KEY, "not json at all")));
        assert!(store.is_empty());
    }

    #[test]
    fn latest_for_prefers_own_then_last_inserted() {
        let mut store = memory_store();
        store.set_status("Alice", "Pat", ReviewStatus::Approved);
        store.set_status("Alice", "Sam", ReviewStatus::Declined);

        // The named reviewer's record wins when present.
        assert_eq!(
            store.latest_for("Alice", "Pat").and_then(|r| r.status),
            Some(ReviewStatus::Approved)
        );
        // Otherwise the most recently inserted record stands in.
        assert_eq!(
            store.latest_for("Alice", "Nobody").and_then(|r| r.status),
            Some(ReviewStatus::Declined)
        );
        assert!(store.latest_for("Bob", "Pat").is_none());
    }

    #[test]
    fn visible_set_is_idempotent() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        controller.set_reviewer("Pat");
        controller.set_search("b");
        let first = controller.visible();
        let second = controller.visible();
        assert_eq!(first, second);
        assert_eq!(first, vec![1]);
    }

    #[test]
    fn search_and_user_selection_are_exclusive() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        controller.select_user(Some("Alice"));
        assert_eq!(controller.search_text(), "Alice");
        assert_eq!(controller.selected_user(), Some("Alice"));

        controller.set_search("bo");
        assert_eq!(controller.selected_user(), None);
        assert_eq!(controller.visible(), vec![1]);

        controller.select_user(None);
        assert_eq!(controller.search_text(), "");
        assert_eq!(controller.visible(), vec![0, 1]);
    }

    #[test]
    fn declined_filter_scenario() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        controller.set_reviewer("Pat");
        controller.open_detail(1);
        controller.set_status(ReviewStatus::Declined);
        controller.back();

        controller.set_status_filter(StatusFilter::Only(ReviewStatus::Declined));
        assert_eq!(controller.visible(), vec![1]);
        controller.set_status_filter(StatusFilter::Only(ReviewStatus::Approved));
        assert!(controller.visible().is_empty());
    }

    #[test]
    fn detail_requires_reviewer() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        assert_eq!(controller.open_detail(0), ViewEvent::ReviewerRequired);
        assert_eq!(controller.view(), ViewState::List);
        assert!(controller.store().get_all("Alice").is_empty());
        assert!(controller.store().is_empty());
    }

    #[test]
    fn summary_matrix_scenario() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        controller.set_reviewer("Pat");
        controller.open_detail(0);
        controller.set_comment("Looks good");
        controller.back();
        controller.set_reviewer("Sam");
        controller.open_detail(0);
        controller.set_status(ReviewStatus::Approved);

        let table = build_summary(controller.catalog(), controller.store());
        assert_eq!(table.reviewers, vec!["Pat".to_string(), "Sam".to_string()]);

        let alice = &table.rows[0];
        assert_eq!(alice.name.as_deref(), Some("Alice"));
        assert_eq!(alice.cells[0].status, None);
        assert_eq!(alice.cells[0].comment, "Looks good");
        assert_eq!(alice.cells[1].status, Some(ReviewStatus::Approved));
        assert_eq!(alice.cells[1].comment, "");
    }

    #[test]
    fn summary_covers_filtered_out_respondents() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        controller.set_reviewer("Sam");
        controller.open_detail(1);
        controller.set_status(ReviewStatus::Tentative);
        controller.back();

        // Bob is filtered out of the list, yet Sam still shows up in the header
        // and Bob still has a row.
        controller.set_search("alice");
        assert_eq!(controller.visible(), vec![0]);
        let table = build_summary(controller.catalog(), controller.store());
        assert_eq!(table.reviewers, vec!["Sam".to_string()]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].cells[0].status, Some(ReviewStatus::Tentative));
    }

    #[test]
    fn duplicate_names_collapse_in_lookups() {
        let mut catalog = RespondentCatalog::new();
        catalog.load(vec![
            respondent("Alice", &[("Q1", "yes")]),
            respondent("Alice", &[("Q1", "no")]),
        ]);
        assert_eq!(catalog.all().len(), 2);
        assert_eq!(catalog.distinct_identities(), vec!["Alice".to_string()]);

        let mut controller = ViewController::new(catalog, memory_store());
        controller.set_reviewer("Pat");
        controller.open_detail(0);
        controller.set_status(ReviewStatus::Approved);
        // Both rows share the same identity-keyed records.
        assert_eq!(controller.indicator(1), Indicator::Green);
    }

    #[test]
    fn csv_reader_maps_columns() {
        let path = temp_path("dataset.csv");
        fs::write(&path, "Name,Role,Q1\nAlice,Engineer,yes\nBob,,no\n").unwrap();
        let records = read_dataset(path.to_str().unwrap(), None).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identity(), Some("Alice"));
        assert_eq!(
            records[0].answers,
            vec![
                ("Role".to_string(), "Engineer".to_string()),
                ("Q1".to_string(), "yes".to_string())
            ]
        );
        // Blank cells are skipped, matching the sparse rows of a sheet export.
        assert_eq!(records[1].answers, vec![("Q1".to_string(), "no".to_string())]);
    }

    #[test]
    fn summary_json_shape() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        controller.set_reviewer("Pat");
        controller.open_detail(0);
        controller.set_status(ReviewStatus::Approved);

        let table = build_summary(controller.catalog(), controller.store());
        let js = build_summary_js(&table, "example.csv");
        assert_eq!(js["info"]["dataset"], json!("example.csv"));
        assert_eq!(js["reviewers"], json!(["Pat"]));
        assert_eq!(js["rows"][0]["name"], json!("Alice"));
        assert_eq!(js["rows"][0]["reviews"]["Pat"]["status"], json!("Approved"));
    }

    #[test]
    fn session_runs_a_basic_review_flow() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        let script =
            b"reviewer Pat\nopen 2\nstatus declined\ncomment weak answers\nback\nsummary\nquit\n";
        let mut output: Vec<u8> = Vec::new();
        session::run_session(&mut controller, Cursor::new(&script[..]), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Alice"));
        assert!(text.contains("Pat (Status)"));
        let record = controller.store().get("Bob", "Pat").unwrap();
        assert_eq!(record.status, Some(ReviewStatus::Declined));
        assert_eq!(record.comment, "weak answers");
    }

    #[test]
    fn session_refuses_detail_without_reviewer() {
        let mut controller = ViewController::new(sample_catalog(), memory_store());
        let script = b"open 1\nquit\n";
        let mut output: Vec<u8> = Vec::new();
        session::run_session(&mut controller, Cursor::new(&script[..]), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Please enter your name before reviewing."));
        assert_eq!(controller.view(), ViewState::List);
        assert!(controller.store().is_empty());
    }
}
