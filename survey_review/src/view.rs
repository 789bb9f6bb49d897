pub use crate::config::*;
use crate::{RespondentCatalog, ReviewStore};

use log::{debug, info};

/// The state machine behind the three presentations: respondent list,
/// single-respondent detail, cross-reviewer summary.
///
/// The controller owns the catalog and the review store, holds the shared
/// filter state of the list view, and applies every user action as one
/// discrete mutation. Each mutating call returns a [`ViewEvent`] so the
/// rendering layer can subscribe without the controller knowing anything
/// about a UI toolkit.
///
/// ```
/// use survey_review::*;
///
/// let mut catalog = RespondentCatalog::new();
/// catalog.load(vec![Respondent {
///     name: Some("Alice".to_string()),
///     answers: vec![("Q1".to_string(), "yes".to_string())],
/// }]);
/// let store = ReviewStore::hydrate(Box::new(MemoryState::default()));
///
/// let mut controller = ViewController::new(catalog, store);
/// // Opening a detail view requires a reviewer name.
/// assert_eq!(controller.open_detail(0), ViewEvent::ReviewerRequired);
/// controller.set_reviewer("Pat");
/// assert_eq!(controller.open_detail(0), ViewEvent::Refreshed);
/// controller.set_status(ReviewStatus::Approved);
/// assert_eq!(
///     controller.store().get("Alice", "Pat").and_then(|r| r.status),
///     Some(ReviewStatus::Approved)
/// );
/// ```
pub struct ViewController {
    catalog: RespondentCatalog,
    store: ReviewStore,
    view: ViewState,
    search_text: String,
    status_filter: StatusFilter,
    selected_user: Option<String>,
    reviewer: String,
}

impl ViewController {
    pub fn new(catalog: RespondentCatalog, store: ReviewStore) -> ViewController {
        ViewController {
            catalog,
            store,
            view: ViewState::List,
            search_text: String::new(),
            status_filter: StatusFilter::All,
            selected_user: None,
            reviewer: String::new(),
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn catalog(&self) -> &RespondentCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &ReviewStore {
        &self.store
    }

    pub fn reviewer(&self) -> &str {
        &self.reviewer
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn selected_user(&self) -> Option<&str> {
        self.selected_user.as_deref()
    }

    /// Sets the active reviewer. The name is trimmed; reviewer identity is
    /// whatever was typed into the name field.
    pub fn set_reviewer(&mut self, name: &str) -> ViewEvent {
        let trimmed = name.trim();
        if trimmed == self.reviewer {
            return ViewEvent::Unchanged;
        }
        self.reviewer = trimmed.to_string();
        ViewEvent::Refreshed
    }

    /// Swaps in a freshly loaded dataset and returns to the list view. Review
    /// records keyed by identities of the previous dataset stay in the store.
    pub fn load_catalog(&mut self, records: Vec<Respondent>) -> ViewEvent {
        self.catalog.load(records);
        self.view = ViewState::List;
        ViewEvent::Refreshed
    }

    /// Sets the free-text search. Search and the discrete user selection are
    /// mutually exclusive entry points into the same filter, so any typed
    /// search clears the selection.
    pub fn set_search(&mut self, text: &str) -> ViewEvent {
        self.selected_user = None;
        self.search_text = text.to_string();
        ViewEvent::Refreshed
    }

    /// Selects a user from the discrete picker, overwriting the search text
    /// with that identity. `None` clears both.
    pub fn select_user(&mut self, name: Option<&str>) -> ViewEvent {
        match name {
            Some(n) => {
                self.search_text = n.to_string();
                self.selected_user = Some(n.to_string());
            }
            None => {
                self.search_text.clear();
                self.selected_user = None;
            }
        }
        ViewEvent::Refreshed
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) -> ViewEvent {
        self.status_filter = filter;
        ViewEvent::Refreshed
    }

    /// The catalog indices of the respondents passing the current filters,
    /// in catalog order. Recomputed on every call, so re-entering the list
    /// view always reflects the current store and filters.
    pub fn visible(&self) -> Vec<usize> {
        self.catalog
            .all()
            .iter()
            .enumerate()
            .filter(|(_, r)| self.passes_filters(r))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Opens the detail view of the respondent at `index`. Refused with a
    /// user-facing prompt when no reviewer name is set; nothing changes in
    /// that case.
    pub fn open_detail(&mut self, index: usize) -> ViewEvent {
        if self.reviewer.is_empty() {
            info!("open_detail: refused, no reviewer name set");
            return ViewEvent::ReviewerRequired;
        }
        if self.catalog.get(index).is_none() {
            debug!("open_detail: index {} out of range", index);
            return ViewEvent::Unchanged;
        }
        self.view = ViewState::Detail(index);
        ViewEvent::Refreshed
    }

    /// Returns to the list view from detail or summary.
    pub fn back(&mut self) -> ViewEvent {
        match self.view {
            ViewState::List => ViewEvent::Unchanged,
            _ => {
                self.view = ViewState::List;
                ViewEvent::Refreshed
            }
        }
    }

    /// Enters the summary view. Allowed from any state.
    pub fn open_summary(&mut self) -> ViewEvent {
        self.view = ViewState::Summary;
        ViewEvent::Refreshed
    }

    /// The respondent currently opened in the detail view.
    pub fn detail(&self) -> Option<&Respondent> {
        match self.view {
            ViewState::Detail(index) => self.catalog.get(index),
            _ => None,
        }
    }

    /// Records the active reviewer's status for the respondent open in the
    /// detail view. Outside the detail view this is a no-op.
    pub fn set_status(&mut self, status: ReviewStatus) -> ViewEvent {
        let identity = match self.detail() {
            Some(r) => r.identity_or_unknown().to_string(),
            None => return ViewEvent::Unchanged,
        };
        self.store.set_status(&identity, &self.reviewer, status);
        ViewEvent::Refreshed
    }

    /// Records the active reviewer's comment for the respondent open in the
    /// detail view. Outside the detail view this is a no-op.
    pub fn set_comment(&mut self, text: &str) -> ViewEvent {
        let identity = match self.detail() {
            Some(r) => r.identity_or_unknown().to_string(),
            None => return ViewEvent::Unchanged,
        };
        self.store.set_comment(&identity, &self.reviewer, text);
        ViewEvent::Refreshed
    }

    /// List-view color coding for the respondent at `index`: the active
    /// reviewer's own record when present, else the latest record by anyone.
    pub fn indicator(&self, index: usize) -> Indicator {
        let respondent = match self.catalog.get(index) {
            Some(r) => r,
            None => return Indicator::Neutral,
        };
        let latest = self
            .store
            .latest_for(respondent.identity_or_unknown(), &self.reviewer);
        Indicator::from_status(latest.and_then(|r| r.status))
    }

    /// The active reviewer's own record for the respondent at `index`, for
    /// the "your rating" badge.
    pub fn own_record(&self, index: usize) -> Option<&RatingRecord> {
        if self.reviewer.is_empty() {
            return None;
        }
        let respondent = self.catalog.get(index)?;
        self.store.get(respondent.identity_or_unknown(), &self.reviewer)
    }

    // A respondent passes when its identity contains the search text
    // (case-folded; empty search matches everyone, a missing identity fails
    // any non-empty search) and at least one reviewer's record matches the
    // status filter.
    fn passes_filters(&self, respondent: &Respondent) -> bool {
        let search = self.search_text.to_lowercase();
        let name_match = search.is_empty()
            || match respondent.identity() {
                Some(name) => name.to_lowercase().contains(&search),
                None => false,
            };
        if !name_match {
            return false;
        }
        match self.status_filter {
            StatusFilter::All => true,
            StatusFilter::Only(status) => self
                .store
                .has_status(respondent.identity_or_unknown(), status),
        }
    }
}
