//! Corpus query entry points.
//!
//! # Responsibility
//! - Filter and order the document corpus against an explicit query state.
//! - Derive filter option lists (hashtags, calendar days) from the corpus.

pub mod hashtag;
pub mod query;
