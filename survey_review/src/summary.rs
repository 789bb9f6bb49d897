use crate::config::*;
use crate::{RespondentCatalog, ReviewStore};

use log::debug;

/// One status/comment pair of the summary matrix. Both fields are blank when
/// the reviewer never touched the respondent.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SummaryCell {
    pub status: Option<ReviewStatus>,
    pub comment: String,
}

/// One respondent row of the summary matrix, with one cell per reviewer in
/// header order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SummaryRow {
    pub name: Option<String>,
    pub cells: Vec<SummaryCell>,
}

/// The reviewer-by-respondent matrix of the summary view.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SummaryTable {
    /// All reviewer names ever recorded, ascending.
    pub reviewers: Vec<String>,
    /// One row per respondent, in catalog order.
    pub rows: Vec<SummaryRow>,
}

/// Derives the summary matrix from the full catalog and store.
///
/// The reviewer header is the union over every respondent in the store, not
/// just those passing the current list filters; the summary always covers the
/// whole dataset. Pure function of its inputs.
pub fn build_summary(catalog: &RespondentCatalog, store: &ReviewStore) -> SummaryTable {
    let reviewers = store.reviewer_names();
    debug!(
        "build_summary: {} respondents, {} reviewers",
        catalog.len(),
        reviewers.len()
    );
    let rows = catalog
        .all()
        .iter()
        .map(|respondent| {
            let identity = respondent.identity_or_unknown();
            let cells = reviewers
                .iter()
                .map(|reviewer| match store.get(identity, reviewer) {
                    Some(record) => SummaryCell {
                        status: record.status,
                        comment: record.comment.clone(),
                    },
                    None => SummaryCell::default(),
                })
                .collect();
            SummaryRow {
                name: respondent.identity().map(|s| s.to_string()),
                cells,
            }
        })
        .collect();
    SummaryTable { reviewers, rows }
}
