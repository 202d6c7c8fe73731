//! Repository layer over the vault store.
//!
//! # Responsibility
//! - Define use-case oriented document access contracts.
//! - Translate storage failures into semantic errors (`NotFound`,
//!   `AlreadyExists`).
//!
//! # Invariants
//! - Repository writes never overwrite on create and never create on modify.
//! - There is no locking or versioning; the last writer wins.

pub mod document_repo;
