//! Document domain model.
//!
//! # Responsibility
//! - Define the document shape shared by every producer, query and aggregator.
//! - Own timestamp formats and wikilink token handling.
//!
//! # Invariants
//! - A document is identified by its slash-separated vault path.
//! - Archiving is the soft-delete mechanism; hard delete leaves no tombstone.

pub mod document;
pub mod time;
pub mod wikilink;
