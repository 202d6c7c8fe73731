//! Filter/sort engine over the whole document corpus.
//!
//! # Responsibility
//! - Apply [`QueryState`] predicates to every document under a folder.
//! - Order results: pinned first, then newest effective date.
//! - Produce the hashtag and calendar-day option lists from the unfiltered
//!   corpus.
//!
//! # Invariants
//! - The sort is stable: documents equal on both keys keep enumeration order.
//! - Archived state, pin state and priority come from the parsed
//!   frontmatter accessors, the same ones the mutator writes through.
//! - Nothing is cached; every call re-reads the corpus.

use crate::model::document::{DateSource, Document};
use crate::model::time::day_string;
use crate::repo::document_repo::{DocumentRepository, RepoResult};
use crate::search::hashtag::collect_into;
use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use std::collections::BTreeSet;
use std::time::Instant;

/// Transient filter state for one query pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    /// Include archived documents.
    pub show_archived: bool,
    /// Only a `#`-prefixed keyword filters; anything else is ignored.
    pub search_keyword: Option<String>,
    /// Calendar day the effective date must fall on.
    pub search_date: Option<NaiveDate>,
    /// Raw text must contain `type: <search_type>`.
    pub search_type: Option<String>,
    /// Accepted priorities; empty accepts all.
    pub selected_priorities: BTreeSet<u8>,
}

impl QueryState {
    /// Default state: archived hidden, no filters.
    pub fn new() -> Self {
        Self::default()
    }

    fn hashtag_filter(&self) -> Option<String> {
        self.search_keyword
            .as_deref()
            .filter(|keyword| keyword.starts_with('#'))
            .map(str::to_lowercase)
    }

    fn type_filter(&self) -> Option<String> {
        self.search_type
            .as_deref()
            .filter(|kind| !kind.is_empty())
            .map(|kind| format!("type: {kind}"))
    }
}

/// One visible document after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryItem {
    pub path: String,
    pub effective_date: NaiveDateTime,
    pub date_source: DateSource,
    pub pinned: bool,
    pub archived: bool,
    pub priority: u8,
    /// Raw `type` value, if any.
    pub doc_type: Option<String>,
    pub context: Option<String>,
}

/// Result of one query pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Visible documents in display order.
    pub items: Vec<QueryItem>,
    /// Number of visible documents.
    pub visible_count: usize,
    /// Every hashtag of the unfiltered corpus, case-folded and sorted.
    pub hashtags: Vec<String>,
    /// Every calendar day of the unfiltered corpus, newest first.
    pub dates: Vec<NaiveDate>,
}

/// Loads every document under `base_folder` and evaluates `state` on it.
///
/// Unreadable documents are skipped.
pub fn run_query<R: DocumentRepository + ?Sized>(
    repo: &R,
    base_folder: &str,
    state: &QueryState,
) -> RepoResult<QueryOutcome> {
    let started_at = Instant::now();
    let documents = repo.load_under(base_folder)?;
    let outcome = evaluate(&documents, state);
    info!(
        "event=query_run module=search status=ok folder={} total={} visible={} duration_ms={}",
        base_folder,
        documents.len(),
        outcome.visible_count,
        started_at.elapsed().as_millis()
    );
    Ok(outcome)
}

/// Filters and orders an in-memory corpus. Pure; performs no I/O.
pub fn evaluate(documents: &[Document], state: &QueryState) -> QueryOutcome {
    let hashtag = state.hashtag_filter();
    let type_marker = state.type_filter();

    let mut tags = BTreeSet::new();
    let mut days = BTreeSet::new();
    let mut items = Vec::new();

    for document in documents {
        collect_into(&document.text, &mut tags);
        let (effective_date, date_source) = document.resolve_effective_date();
        days.insert(effective_date.date());

        let frontmatter = document.frontmatter();
        let archived = frontmatter.is_archived();
        if archived && !state.show_archived {
            continue;
        }
        if let Some(hashtag) = &hashtag {
            if !document.text.to_lowercase().contains(hashtag.as_str()) {
                continue;
            }
        }
        if let Some(day) = state.search_date {
            if effective_date.date() != day {
                continue;
            }
        }
        if let Some(marker) = &type_marker {
            if !document.text.contains(marker.as_str()) {
                continue;
            }
        }
        let priority = frontmatter.priority();
        if !state.selected_priorities.is_empty() && !state.selected_priorities.contains(&priority) {
            continue;
        }

        items.push(QueryItem {
            path: document.path.clone(),
            effective_date,
            date_source,
            pinned: frontmatter.is_pinned(),
            archived,
            priority,
            doc_type: frontmatter.type_name().map(str::to_string),
            context: frontmatter.context().map(str::to_string),
        });
    }

    sort_items(&mut items);
    QueryOutcome {
        visible_count: items.len(),
        items,
        hashtags: tags.into_iter().collect(),
        dates: days.into_iter().rev().collect(),
    }
}

/// Pinned first, then descending effective date. Stable.
pub fn sort_items(items: &mut [QueryItem]) {
    items.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.effective_date.cmp(&a.effective_date))
    });
}

/// `YYYY-MM-DD` labels for [`QueryOutcome::dates`].
pub fn date_labels(outcome: &QueryOutcome) -> Vec<String> {
    outcome.dates.iter().copied().map(day_string).collect()
}
