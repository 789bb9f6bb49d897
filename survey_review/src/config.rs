// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identity used for respondents whose `Name` cell is missing or blank.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// One row of the ingested dataset: the respondent's display name plus the
/// question/answer pairs of every other column, in column order.
///
/// Respondents are immutable after load. The display name doubles as the
/// respondent identity, with no uniqueness guarantee: two rows with the same
/// name stay distinct in the catalog but collapse to a single entry in any
/// identity-keyed lookup.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Respondent {
    pub name: Option<String>,
    pub answers: Vec<(String, String)>,
}

impl Respondent {
    /// The identity of this respondent, or `None` when the name is missing
    /// or blank.
    pub fn identity(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The identity used to key review records. Nameless respondents share
    /// the "unknown" bucket.
    pub fn identity_or_unknown(&self) -> &str {
        self.identity().unwrap_or(UNKNOWN_IDENTITY)
    }
}

// ******** Review data structures *********

/// The opinion a reviewer can attach to a respondent.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ReviewStatus {
    Approved,
    Declined,
    Tentative,
}

impl ReviewStatus {
    pub fn parse(s: &str) -> Option<ReviewStatus> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Some(ReviewStatus::Approved),
            "declined" => Some(ReviewStatus::Declined),
            "tentative" => Some(ReviewStatus::Tentative),
            _ => None,
        }
    }
}

impl Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Approved => write!(f, "Approved"),
            ReviewStatus::Declined => write!(f, "Declined"),
            ReviewStatus::Tentative => write!(f, "Tentative"),
        }
    }
}

/// One reviewer's opinion of one respondent. A record is created lazily on
/// the first status or comment edit and never deleted afterwards, so either
/// field may still be unset.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

/// A rating record together with the reviewer who owns it. Entries are kept
/// in insertion order per respondent; that order is the `latest_for`
/// tie-break.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub reviewer: String,
    #[serde(flatten)]
    pub record: RatingRecord,
}

// ******** View data structures *********

/// The presentation currently active. Exactly one of the three is shown at
/// any time; `Detail` carries the catalog index of the opened respondent.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ViewState {
    List,
    Detail(usize),
    Summary,
}

/// The status filter of the list view.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ReviewStatus),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<StatusFilter> {
        if s.trim().eq_ignore_ascii_case("all") {
            Some(StatusFilter::All)
        } else {
            ReviewStatus::parse(s).map(StatusFilter::Only)
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::Only(s) => write!(f, "{}", s),
        }
    }
}

/// Change notification returned by every mutating view operation. The
/// rendering layer subscribes by matching on the returned value.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ViewEvent {
    /// State changed; the active view must be re-derived and re-rendered.
    Refreshed,
    /// The transition was refused because no reviewer name is set. The user
    /// must be prompted; nothing else changed.
    ReviewerRequired,
    /// Nothing to re-render.
    Unchanged,
}

/// List-view color coding derived from the most relevant rating record.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Indicator {
    Green,
    Red,
    Blue,
    Neutral,
}

impl Indicator {
    pub fn from_status(status: Option<ReviewStatus>) -> Indicator {
        match status {
            Some(ReviewStatus::Approved) => Indicator::Green,
            Some(ReviewStatus::Declined) => Indicator::Red,
            Some(ReviewStatus::Tentative) => Indicator::Blue,
            None => Indicator::Neutral,
        }
    }
}

// ******** Errors *********

/// Errors surfaced by the review state layer. None of them is fatal: the
/// worst-case failure mode of the system is a stale or empty view.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReviewError {
    PersistFailed(String),
}

impl Error for ReviewError {}

impl Display for ReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewError::PersistFailed(msg) => {
                write!(f, "could not persist review state: {}", msg)
            }
        }
    }
}
