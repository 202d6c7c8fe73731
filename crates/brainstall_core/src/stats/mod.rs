//! Activity statistics over the captured corpus.

pub mod activity;
