//! Day buckets, heatmap grid and summary counters.
//!
//! # Responsibility
//! - Bucket documents by effective-date calendar day.
//! - Lay out a 7 x 12 weekday/week grid anchored on "today".
//! - Count documents, archived split, active days and characters.
//!
//! # Invariants
//! - Every document lands in exactly one day bucket, archived or not.
//! - The grid is derived from `today` alone; stored dates only feed counts.
//! - Intensity is relative to the maximum count inside the visible window.

use crate::model::document::Document;
use crate::model::time::day_key;
use crate::repo::document_repo::{DocumentRepository, RepoResult};
use chrono::{Datelike, Duration, NaiveDate};
use log::info;
use std::collections::BTreeMap;

/// Grid rows, Sunday first.
pub const HEATMAP_ROWS: usize = 7;
/// Grid columns, oldest week first.
pub const HEATMAP_WEEKS: usize = 12;

const MIN_INTENSITY: f64 = 0.3;

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub date: NaiveDate,
    pub count: usize,
    /// `0.0` for empty days, else in `0.3..=1.0`.
    pub intensity: f64,
}

/// Heatmap rows (weekday) of columns (week).
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub rows: Vec<Vec<HeatCell>>,
    pub max_count_in_window: usize,
}

/// Aggregated activity figures for one corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityStats {
    /// `YYYYMMDD` -> number of documents.
    pub day_counts: BTreeMap<String, usize>,
    pub heatmap: Heatmap,
    pub total_documents: usize,
    pub archived_documents: usize,
    pub active_documents: usize,
    /// Distinct calendar days with at least one document.
    pub active_days: usize,
    /// Unicode scalar values across every raw text.
    pub total_chars: usize,
    /// `total_chars / active_days`, rounded; 0 without active days.
    pub average_chars_per_day: usize,
}

/// Loads every document under `base_folder` and summarizes it.
pub fn collect_activity<R: DocumentRepository + ?Sized>(
    repo: &R,
    base_folder: &str,
    today: NaiveDate,
) -> RepoResult<ActivityStats> {
    let documents = repo.load_under(base_folder)?;
    let stats = summarize(&documents, today);
    info!(
        "event=stats_collect module=stats status=ok folder={} total={} archived={} active_days={}",
        base_folder, stats.total_documents, stats.archived_documents, stats.active_days
    );
    Ok(stats)
}

/// Pure aggregation over an in-memory corpus.
pub fn summarize(documents: &[Document], today: NaiveDate) -> ActivityStats {
    let day_counts = day_counts(documents);
    let archived_documents = documents
        .iter()
        .filter(|document| document.frontmatter().is_archived())
        .count();
    let total_chars = documents
        .iter()
        .map(|document| document.text.chars().count())
        .sum();
    let active_days = day_counts.len();
    let average_chars_per_day = if active_days == 0 {
        0
    } else {
        (total_chars as f64 / active_days as f64).round() as usize
    };

    ActivityStats {
        heatmap: heatmap(&day_counts, today),
        day_counts,
        total_documents: documents.len(),
        archived_documents,
        active_documents: documents.len() - archived_documents,
        active_days,
        total_chars,
        average_chars_per_day,
    }
}

/// Buckets documents by the calendar day of their effective date.
pub fn day_counts(documents: &[Document]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for document in documents {
        let key = day_key(document.effective_date().date());
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Calendar day shown at `row` (0 = Sunday) and `week` (0 = oldest).
///
/// Cells later than `today` in the current week are future dates and
/// always read zero.
pub fn cell_date(today: NaiveDate, row: usize, week: usize) -> NaiveDate {
    let weeks_ago = (HEATMAP_WEEKS - 1 - week) as i64;
    let today_row = i64::from(today.weekday().num_days_from_sunday());
    let days_ago = weeks_ago * 7 + today_row - row as i64;
    today - Duration::days(days_ago)
}

/// Builds the weekday x week grid for `today`.
pub fn heatmap(day_counts: &BTreeMap<String, usize>, today: NaiveDate) -> Heatmap {
    let mut rows: Vec<Vec<HeatCell>> = (0..HEATMAP_ROWS)
        .map(|row| {
            (0..HEATMAP_WEEKS)
                .map(|week| {
                    let date = cell_date(today, row, week);
                    HeatCell {
                        date,
                        count: day_counts.get(&day_key(date)).copied().unwrap_or(0),
                        intensity: 0.0,
                    }
                })
                .collect()
        })
        .collect();

    let max_count_in_window = rows
        .iter()
        .flatten()
        .map(|cell| cell.count)
        .max()
        .unwrap_or(0);
    let scale = max_count_in_window.max(1) as f64;
    for cell in rows.iter_mut().flatten() {
        if cell.count > 0 {
            cell.intensity =
                (MIN_INTENSITY + (1.0 - MIN_INTENSITY) * cell.count as f64 / scale).min(1.0);
        }
    }

    Heatmap {
        rows,
        max_count_in_window,
    }
}
