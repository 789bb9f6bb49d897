mod config;
mod summary;
mod view;

pub mod manual;
pub mod quick_start;

use log::{debug, info, warn};

use std::collections::{BTreeSet, HashMap};

pub use crate::config::*;
pub use crate::summary::*;
pub use crate::view::*;

/// Fixed versioned key under which the serialized review state lives in the
/// durable collaborator. Bump the suffix when the snapshot format changes.
pub const STATE_KEY: &str = "reviews_v1";

/// The durable key-value collaborator holding the persisted review state.
///
/// The store treats it as opaque: string keys to string payloads, read once
/// at startup, rewritten in full after every mutation. Implementations decide
/// where the bytes live (a JSON file for the command line tool,
/// [`MemoryState`] for tests).
pub trait StateStore {
    fn get(&mut self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), ReviewError>;
}

/// In-memory [`StateStore`]. Nothing survives the process; used by tests and
/// as a fallback when no durable location is configured.
#[derive(Default, Debug, Clone)]
pub struct MemoryState {
    entries: HashMap<String, String>,
}

impl MemoryState {
    /// A state preloaded with one key, as if a previous run had written it.
    pub fn preloaded(key: &str, value: &str) -> MemoryState {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        MemoryState { entries }
    }
}

impl StateStore for MemoryState {
    fn get(&mut self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), ReviewError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The immutable list of respondents of the loaded dataset, in load order.
///
/// A new dataset replaces the catalog wholesale; rows are never mutated in
/// place.
#[derive(Default, Debug, Clone)]
pub struct RespondentCatalog {
    respondents: Vec<Respondent>,
}

impl RespondentCatalog {
    pub fn new() -> RespondentCatalog {
        RespondentCatalog::default()
    }

    /// Replaces any prior catalog entirely.
    pub fn load(&mut self, records: Vec<Respondent>) {
        info!("load: catalog replaced, {} respondents", records.len());
        self.respondents = records;
    }

    /// All respondents in original load order. Duplicate identities are
    /// preserved here even though identity-keyed lookups collapse them.
    pub fn all(&self) -> &[Respondent] {
        &self.respondents
    }

    pub fn get(&self, index: usize) -> Option<&Respondent> {
        self.respondents.get(index)
    }

    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }

    /// The distinct identities of the catalog, ascending and case-sensitive,
    /// blank and missing names excluded. This feeds the user-selection
    /// control.
    pub fn distinct_identities(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .respondents
            .iter()
            .filter_map(|r| r.identity())
            .collect();
        names.into_iter().map(|s| s.to_string()).collect()
    }
}

/// The mapping from respondent identity to per-reviewer rating records: the
/// single source of truth for all rendered rating state.
///
/// Every mutation serializes the whole mapping and writes it to the durable
/// collaborator under [`STATE_KEY`] before returning. Entries referring to
/// respondents of a previously loaded dataset are tolerated and kept.
///
/// ```
/// use survey_review::{MemoryState, ReviewStatus, ReviewStore};
///
/// let mut store = ReviewStore::hydrate(Box::new(MemoryState::default()));
/// store.set_status("Alice", "Pat", ReviewStatus::Approved);
/// store.set_comment("Alice", "Pat", "Solid answers");
/// assert_eq!(
///     store.get("Alice", "Pat").and_then(|r| r.status),
///     Some(ReviewStatus::Approved)
/// );
/// ```
pub struct ReviewStore {
    reviews: HashMap<String, Vec<ReviewEntry>>,
    state: Box<dyn StateStore>,
}

impl ReviewStore {
    /// Builds the store from the durable collaborator. A missing or
    /// unparsable persisted value means "no prior data", never a failure.
    pub fn hydrate(mut state: Box<dyn StateStore>) -> ReviewStore {
        let reviews = match state.get(STATE_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("hydrate: discarding unreadable review state: {}", e);
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };
        info!("hydrate: {} respondents with prior reviews", reviews.len());
        ReviewStore { reviews, state }
    }

    /// All reviewer entries for a respondent, in insertion order. Empty when
    /// nobody has rated it yet.
    pub fn get_all(&self, identity: &str) -> &[ReviewEntry] {
        match self.reviews.get(identity) {
            Some(entries) => entries.as_slice(),
            None => &[],
        }
    }

    pub fn get(&self, identity: &str, reviewer: &str) -> Option<&RatingRecord> {
        self.get_all(identity)
            .iter()
            .find(|e| e.reviewer == reviewer)
            .map(|e| &e.record)
    }

    /// The named reviewer's record if present, else the most recently
    /// inserted record among all reviewers of this respondent. This stands in
    /// for "the last person who rated it" when the active reviewer has not
    /// rated yet.
    pub fn latest_for(&self, identity: &str, reviewer: &str) -> Option<&RatingRecord> {
        let entries = self.reviews.get(identity)?;
        entries
            .iter()
            .find(|e| e.reviewer == reviewer)
            .or_else(|| entries.last())
            .map(|e| &e.record)
    }

    /// Sets the status of `reviewer`'s record, creating the record if absent
    /// and leaving its comment untouched. A blank reviewer name makes this a
    /// silent no-op.
    pub fn set_status(&mut self, identity: &str, reviewer: &str, status: ReviewStatus) {
        let reviewer = reviewer.trim();
        if reviewer.is_empty() {
            debug!("set_status: blank reviewer name, ignoring");
            return;
        }
        self.entry_mut(identity, reviewer).status = Some(status);
        self.persist();
    }

    /// Sets the comment of `reviewer`'s record, creating the record if absent
    /// and leaving its status untouched. Same reviewer guard as
    /// [`ReviewStore::set_status`].
    pub fn set_comment(&mut self, identity: &str, reviewer: &str, comment: &str) {
        let reviewer = reviewer.trim();
        if reviewer.is_empty() {
            debug!("set_comment: blank reviewer name, ignoring");
            return;
        }
        self.entry_mut(identity, reviewer).comment = comment.to_string();
        self.persist();
    }

    /// Whether at least one reviewer gave this respondent the given status.
    pub fn has_status(&self, identity: &str, status: ReviewStatus) -> bool {
        self.get_all(identity)
            .iter()
            .any(|e| e.record.status == Some(status))
    }

    /// The union of reviewer names across all respondents, ascending.
    pub fn reviewer_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .reviews
            .values()
            .flatten()
            .map(|e| e.reviewer.as_str())
            .collect();
        names.into_iter().map(|s| s.to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Direct access to the durable collaborator, mainly for tests that
    /// simulate a restart.
    pub fn state_mut(&mut self) -> &mut dyn StateStore {
        self.state.as_mut()
    }

    // The single upsert point: record creation only ever happens here, on an
    // explicit mutation, never as a side effect of rendering.
    fn entry_mut(&mut self, identity: &str, reviewer: &str) -> &mut RatingRecord {
        let entries = self.reviews.entry(identity.to_string()).or_default();
        let pos = match entries.iter().position(|e| e.reviewer == reviewer) {
            Some(p) => p,
            None => {
                debug!("entry_mut: new record for {:?} by {:?}", identity, reviewer);
                entries.push(ReviewEntry {
                    reviewer: reviewer.to_string(),
                    record: RatingRecord::default(),
                });
                entries.len() - 1
            }
        };
        &mut entries[pos].record
    }

    // Serializes the entire store and writes it out synchronously. By the
    // time a mutating call returns, the persisted copy matches memory; a
    // write failure leaves stale persisted state and is only logged.
    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.reviews) {
            Ok(p) => p,
            Err(e) => {
                warn!("persist: could not serialize review state: {}", e);
                return;
            }
        };
        if let Err(e) = self.state.put(STATE_KEY, &payload) {
            warn!("persist: {}", e);
        }
    }
}

impl std::fmt::Debug for ReviewStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewStore")
            .field("reviews", &self.reviews)
            .finish()
    }
}

// Deep equality over the review records, ignoring the durable collaborator.
impl PartialEq for ReviewStore {
    fn eq(&self, other: &Self) -> bool {
        self.reviews == other.reviews
    }
}
